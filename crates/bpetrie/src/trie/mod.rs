//! # Symbol Trie
//!
//! A character-level prefix tree over the symbols of a [`SymbolVocab`](crate::vocab::SymbolVocab).
//!
//! Nodes live in an arena and refer to each other by index; each node keeps a
//! parent index, which the encoder uses to backtrack to the nearest terminal.

mod symbol_trie;

#[doc(inline)]
pub use symbol_trie::*;
