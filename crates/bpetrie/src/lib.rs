//! # bpetrie
//!
//! Learns a subword vocabulary from a text corpus by iterative byte-pair merging,
//! and encodes/decodes text against that vocabulary with a backtracking
//! longest-match trie walk.
//!
//! ## Fit / Transform
//!
//! ```rust
//! use bpetrie::{BytePairEncoder, BytePairTrainerOptions};
//!
//! fn example() -> bpetrie::BPTResult<()> {
//!     let options = BytePairTrainerOptions::with_target_vocab_size(64);
//!     let mut encoder = BytePairEncoder::<u32>::new(options);
//!
//!     encoder.fit(["low lower newest widest", "lowest newer"])?;
//!
//!     let tokens = encoder.transform("newest lower")?;
//!     assert_eq!(encoder.inverse_transform(&tokens)?, "newest lower");
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
//!
//! ## Layout
//!
//! * [`segmentation`] - whitespace word splitting with boundary markers.
//! * [`training`] - word counting, pair statistics and the merge loop.
//! * [`vocab`] - the ``{symbol <-> id}`` bijection, and its persistence.
//! * [`trie`] - the prefix tree over vocabulary symbols.
//! * [`encoders`] / [`decoders`] - token encode/decode over a fitted vocab.
//!
//! ## Crate Features
#![doc = document_features::document_features!()]
#![warn(missing_docs, unused)]

pub mod decoders;
pub mod encoders;
pub mod segmentation;
pub mod training;
pub mod trie;
pub mod vocab;

mod byte_pair_encoder;
mod errors;
mod types;

#[doc(inline)]
pub use byte_pair_encoder::*;
#[doc(inline)]
pub use decoders::TokenDecoder;
#[doc(inline)]
pub use encoders::TokenEncoder;
#[doc(inline)]
pub use errors::*;
#[doc(inline)]
pub use training::{BytePairTrainerOptions, StopMode};
#[doc(inline)]
pub use types::*;
#[doc(inline)]
pub use vocab::SymbolVocab;

/// Default word boundary marker; appended to every word before training and encoding.
pub const DEFAULT_BOUNDARY_MARKER: char = '\u{2581}';

/// Default symbol for the reserved unknown token (id 0).
pub const DEFAULT_UNKNOWN_SYMBOL: &str = "<unk>";

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        /// Default value for parallel processing; based on the `rayon` feature.
        pub const DEFAULT_PARALLEL: bool = true;
    } else {
        /// Default value for parallel processing; based on the `rayon` feature.
        pub const DEFAULT_PARALLEL: bool = false;
    }
}
