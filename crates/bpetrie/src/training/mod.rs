//! # Vocabulary Training
//!
//! Training runs in four stages:
//! 1. [`WordCounter`] reduces the corpus to unique boundary-marked words and their counts.
//! 2. [`PairIndex`] collects adjacent-symbol-pair counts and the words containing each pair.
//! 3. [`BytePairTrainer`] repeatedly merges the most frequent pair, until a stop condition holds.
//! 4. The resulting symbols are assembled into a [`SymbolVocab`](crate::vocab::SymbolVocab).

mod pair_index;
mod symbol_word;
mod trainer;
mod word_counter;

#[doc(inline)]
pub use pair_index::*;
#[doc(inline)]
pub use symbol_word::*;
#[doc(inline)]
pub use trainer::*;
#[doc(inline)]
pub use word_counter::*;
