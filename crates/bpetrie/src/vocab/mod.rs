//! # Symbol Vocabulary
//!
//! [`SymbolVocab`] is the ``{symbol <-> id}`` bijection produced by training.
//! Token 0 is reserved for the unknown symbol; ids `1..len` are the learned
//! symbols in sorted order.
//!
//! The vocabulary is the only persisted state; see [`io`].

pub mod io;
mod symbol_vocab;

#[doc(inline)]
pub use symbol_vocab::*;
