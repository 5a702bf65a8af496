//! # Symbol Vocab

use std::collections::BTreeSet;

use ahash::AHashMap;

use crate::{
    BPTError,
    BPTResult,
    types::{Symbol, TokenType},
};

/// A bijective ``{symbol <-> T}`` vocabulary with a reserved unknown token.
///
/// Invariants:
/// * `len() >= 1`; token 0 is the unknown symbol.
/// * every symbol is non-empty and unique.
/// * every id in `0..len()` is representable as `T`.
#[derive(Debug, Clone)]
pub struct SymbolVocab<T: TokenType> {
    token_to_symbol: Vec<Symbol>,
    symbol_to_token: AHashMap<Symbol, T>,
}

impl<T: TokenType> PartialEq for SymbolVocab<T> {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.token_to_symbol == other.token_to_symbol
    }
}

impl<T: TokenType> Eq for SymbolVocab<T> {}

impl<T: TokenType> SymbolVocab<T> {
    /// Assemble a vocabulary from a set of learned symbols.
    ///
    /// Symbols are de-duplicated and sorted; they receive ids `1..=n` in order.
    /// The unknown symbol receives id 0.
    ///
    /// ## Arguments
    /// * `symbols` - the learned symbols; should include every initial character.
    /// * `unknown_symbol` - the symbol for token 0.
    ///
    /// ## Returns
    /// The vocabulary, or [`BPTError::InvalidVocab`] if it does not fit in `T`,
    /// or if a learned symbol equals `unknown_symbol`.
    pub fn assemble<I>(
        symbols: I,
        unknown_symbol: &str,
    ) -> BPTResult<Self>
    where
        I: IntoIterator<Item = Symbol>,
    {
        let symbols: BTreeSet<Symbol> = symbols
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();

        if symbols.contains(unknown_symbol) {
            return Err(BPTError::InvalidVocab(format!(
                "learned symbol {unknown_symbol:?} collides with the unknown symbol"
            )));
        }

        let token_to_symbol: Vec<Symbol> = core::iter::once(Symbol::from(unknown_symbol))
            .chain(symbols)
            .collect();

        Self::from_token_symbols(token_to_symbol)
    }

    /// Build a vocabulary from an id-ordered symbol list.
    ///
    /// ## Arguments
    /// * `token_to_symbol` - `token_to_symbol[i]` is the symbol for token `i`;
    ///   entry 0 is the unknown symbol.
    pub fn from_token_symbols(token_to_symbol: Vec<Symbol>) -> BPTResult<Self> {
        if token_to_symbol.is_empty() {
            return Err(BPTError::InvalidVocab(
                "vocabulary has no unknown token".to_string(),
            ));
        }
        if T::from_usize(token_to_symbol.len() - 1).is_none() {
            return Err(BPTError::InvalidVocab(format!(
                "vocabulary size {} exceeds the token type range",
                token_to_symbol.len()
            )));
        }

        let mut symbol_to_token: AHashMap<Symbol, T> =
            AHashMap::with_capacity(token_to_symbol.len());
        for (idx, symbol) in token_to_symbol.iter().enumerate() {
            if symbol.is_empty() {
                return Err(BPTError::InvalidVocab(format!(
                    "token {idx} has an empty symbol"
                )));
            }
            let token = T::from_usize(idx).expect("idx is in range of T");
            if let Some(prev) = symbol_to_token.insert(symbol.clone(), token) {
                return Err(BPTError::InvalidVocab(format!(
                    "symbol {symbol:?} is assigned to both {prev:?} and {token:?}"
                )));
            }
        }

        Ok(Self {
            token_to_symbol,
            symbol_to_token,
        })
    }

    /// Build a vocabulary from unordered ``(symbol, token)`` pairs.
    ///
    /// The tokens must be exactly `0..n`.
    pub fn from_symbol_tokens<I>(pairs: I) -> BPTResult<Self>
    where
        I: IntoIterator<Item = (Symbol, T)>,
    {
        let mut pairs: Vec<(Symbol, T)> = pairs.into_iter().collect();
        pairs.sort_unstable_by_key(|(_, token)| *token);

        for (idx, (symbol, token)) in pairs.iter().enumerate() {
            if token.to_usize() != Some(idx) {
                return Err(BPTError::InvalidVocab(format!(
                    "expected token {idx}, found {token:?} for symbol {symbol:?}"
                )));
            }
        }

        Self::from_token_symbols(pairs.into_iter().map(|(symbol, _)| symbol).collect())
    }

    /// The number of tokens, including the unknown token.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.token_to_symbol.len()
    }

    /// The largest token id.
    pub fn max_token(&self) -> T {
        T::from_usize(self.len() - 1).expect("len is in range of T")
    }

    /// The reserved unknown token.
    pub fn unknown_token(&self) -> T {
        T::zero()
    }

    /// The symbol of the reserved unknown token.
    pub fn unknown_symbol(&self) -> &str {
        &self.token_to_symbol[0]
    }

    /// Look up the token for a symbol.
    ///
    /// The unknown symbol maps to the unknown token.
    pub fn lookup_token(
        &self,
        symbol: &str,
    ) -> Option<T> {
        self.symbol_to_token.get(symbol).copied()
    }

    /// Look up the symbol for a token; `None` if out of range.
    pub fn lookup_symbol(
        &self,
        token: T,
    ) -> Option<&str> {
        token
            .to_usize()
            .and_then(|idx| self.token_to_symbol.get(idx))
            .map(|s| s.as_str())
    }

    /// The id-ordered symbol table.
    pub fn symbols(&self) -> &[Symbol] {
        &self.token_to_symbol
    }

    /// Iterate over ``(token, symbol)`` in token order, including the unknown token.
    pub fn iter(&self) -> impl Iterator<Item = (T, &str)> + '_ {
        self.token_to_symbol
            .iter()
            .enumerate()
            .map(|(idx, symbol)| {
                (
                    T::from_usize(idx).expect("idx is in range of T"),
                    symbol.as_str(),
                )
            })
    }

    /// Iterate over ``(token, symbol)`` for the learned symbols; skips the unknown token.
    pub fn learned(&self) -> impl Iterator<Item = (T, &str)> + '_ {
        self.iter().skip(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(items: &[&str]) -> Vec<Symbol> {
        items.iter().map(|&s| Symbol::from(s)).collect()
    }

    #[test]
    fn test_assemble() {
        let vocab: SymbolVocab<u16> =
            SymbolVocab::assemble(symbols(&["b", "a", "ab", "_", "a", ""]), "<unk>").unwrap();

        assert_eq!(vocab.len(), 5);
        assert_eq!(vocab.symbols(), &["<unk>", "_", "a", "ab", "b"]);
        assert_eq!(vocab.unknown_token(), 0);
        assert_eq!(vocab.unknown_symbol(), "<unk>");
        assert_eq!(vocab.max_token(), 4);

        assert_eq!(vocab.lookup_token("ab"), Some(3));
        assert_eq!(vocab.lookup_token("<unk>"), Some(0));
        assert_eq!(vocab.lookup_token("zz"), None);

        assert_eq!(vocab.lookup_symbol(1), Some("_"));
        assert_eq!(vocab.lookup_symbol(5), None);

        assert_eq!(
            vocab.learned().collect::<Vec<_>>(),
            vec![(1, "_"), (2, "a"), (3, "ab"), (4, "b")]
        );
    }

    #[test]
    fn test_assemble_rejects_unknown_collision() {
        // A learned "?" would lose its trie entry to the unknown token.
        let result = SymbolVocab::<u32>::assemble(symbols(&["?", "x"]), "?");
        assert!(matches!(result, Err(BPTError::InvalidVocab(_))));
    }

    #[test]
    fn test_assemble_overflow() {
        let many: Vec<Symbol> = (0..300).map(|i| Symbol::from(format!("s{i}"))).collect();
        assert!(matches!(
            SymbolVocab::<u8>::assemble(many, "<unk>"),
            Err(BPTError::InvalidVocab(_))
        ));
    }

    #[test]
    fn test_from_token_symbols_validation() {
        assert!(SymbolVocab::<u32>::from_token_symbols(vec![]).is_err());
        assert!(SymbolVocab::<u32>::from_token_symbols(symbols(&["<unk>", "a", "a"])).is_err());
        assert!(SymbolVocab::<u32>::from_token_symbols(symbols(&["<unk>", ""])).is_err());
    }

    #[test]
    fn test_from_symbol_tokens() {
        let vocab = SymbolVocab::<u32>::from_symbol_tokens([
            (Symbol::from("b"), 2),
            (Symbol::from("<unk>"), 0),
            (Symbol::from("a"), 1),
        ])
        .unwrap();
        assert_eq!(vocab.symbols(), &["<unk>", "a", "b"]);

        let gap = SymbolVocab::<u32>::from_symbol_tokens([
            (Symbol::from("<unk>"), 0),
            (Symbol::from("a"), 2),
        ]);
        assert!(matches!(gap, Err(BPTError::InvalidVocab(_))));
    }
}
