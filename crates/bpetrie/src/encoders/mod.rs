//! # Token Encoders
//!
//! [`TrieEncoder`] is the greedy longest-match tokenizer over a [`SymbolTrie`](crate::trie::SymbolTrie).

mod token_encoder;
mod trie_encoder;

#[doc(inline)]
pub use token_encoder::*;
#[doc(inline)]
pub use trie_encoder::*;
