//! # Vocabulary IO
//!
//! Vocabularies are stored one entry per line, as ``{base64(symbol)} {id}``.
//! The boundary marker and segmentation settings are not part of the file;
//! they are supplied alongside, as options.
//!
//! ## Loading A Vocab
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use bpetrie::{
//!     BytePairEncoder,
//!     BytePairTrainerOptions,
//!     SymbolVocab,
//!     vocab::io::load_base64_vocab_path,
//! };
//!
//! fn example() -> bpetrie::BPTResult<BytePairEncoder<u32>> {
//!     let vocab: SymbolVocab<u32> = load_base64_vocab_path("vocab.bpt")?;
//!
//!     Ok(BytePairEncoder::from_vocab(
//!         Arc::new(vocab),
//!         BytePairTrainerOptions::with_merge_count(0),
//!     ))
//! }
//! ```

mod base64_vocab;

#[doc(inline)]
pub use base64_vocab::*;
