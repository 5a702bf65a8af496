//! # Common Types and Traits

use core::{
    fmt::{Debug, Display},
    hash::Hash,
    ops::{AddAssign, SubAssign},
};

use compact_str::CompactString;
use num_traits::{FromPrimitive, Num, ToPrimitive, Unsigned};

/// A type that can be used as a token id.
///
/// Token `0` is always the reserved unknown token.
pub trait TokenType:
    'static
    + Default
    + Debug
    + Clone
    + Copy
    + Hash
    + Send
    + Sync
    + Unsigned
    + FromPrimitive
    + ToPrimitive
    + Ord
{
}

impl<T> TokenType for T where
    T: 'static
        + Default
        + Debug
        + Clone
        + Copy
        + Hash
        + Send
        + Sync
        + Unsigned
        + FromPrimitive
        + ToPrimitive
        + Ord
{
}

/// A type that can be used as a word / pair count.
pub trait CountType:
    Num
    + AddAssign
    + SubAssign
    + Default
    + Copy
    + Debug
    + Display
    + Send
    + Sync
    + Hash
    + Ord
    + FromPrimitive
    + ToPrimitive
{
}

impl<C> CountType for C where
    C: Num
        + AddAssign
        + SubAssign
        + Default
        + Copy
        + Debug
        + Display
        + Send
        + Sync
        + Hash
        + Ord
        + FromPrimitive
        + ToPrimitive
{
}

/// A vocabulary atom: a single character, or a merged substring.
pub type Symbol = CompactString;

/// A pair of adjacent symbols.
pub type Pair = (Symbol, Symbol);

/// Concatenate a pair into its merged symbol.
pub fn merge_symbol(pair: &Pair) -> Symbol {
    let mut merged = Symbol::with_capacity(pair.0.len() + pair.1.len());
    merged.push_str(&pair.0);
    merged.push_str(&pair.1);
    merged
}

/// Check if a type is `Send`.
#[cfg(test)]
pub(crate) fn check_is_send<S: Send>(_: S) {}

/// Check if a type is `Sync`.
#[cfg(test)]
pub(crate) fn check_is_sync<S: Sync>(_: S) {}
