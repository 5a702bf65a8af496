//! # Symbol Decoder

use std::sync::Arc;

use crate::{BPTResult, TokenType, decoders::TokenDecoder, vocab::SymbolVocab};

/// A [`TokenDecoder`] which concatenates vocabulary symbols.
///
/// Each boundary marker becomes a single space, and one trailing space is dropped;
/// so text whose words are separated by single spaces decodes to itself.
///
/// Tokens outside the vocabulary decode as the unknown symbol.
#[derive(Debug, Clone)]
pub struct SymbolDecoder<T: TokenType> {
    vocab: Arc<SymbolVocab<T>>,
    boundary_marker: char,
}

impl<T: TokenType> SymbolDecoder<T> {
    /// Create a new decoder.
    ///
    /// ## Arguments
    /// * `vocab` - The vocabulary to decode against.
    /// * `boundary_marker` - The marker to turn back into spaces.
    pub fn new(
        vocab: Arc<SymbolVocab<T>>,
        boundary_marker: char,
    ) -> Self {
        Self {
            vocab,
            boundary_marker,
        }
    }

    /// The vocabulary.
    pub fn vocab(&self) -> &Arc<SymbolVocab<T>> {
        &self.vocab
    }

    /// The boundary marker.
    pub fn boundary_marker(&self) -> char {
        self.boundary_marker
    }

    /// The symbol for a token; the unknown symbol if out of range.
    pub fn symbol(
        &self,
        token: T,
    ) -> &str {
        self.vocab
            .lookup_symbol(token)
            .unwrap_or_else(|| self.vocab.unknown_symbol())
    }

    /// Concatenate the symbols of `tokens`, markers included.
    pub fn decode_symbols(
        &self,
        tokens: &[T],
    ) -> String {
        tokens.iter().map(|&t| self.symbol(t)).collect()
    }
}

impl<T: TokenType> TokenDecoder<T> for SymbolDecoder<T> {
    fn try_decode_append(
        &self,
        tokens: &[T],
        text: &mut String,
    ) -> BPTResult<()> {
        let start = text.len();
        for &token in tokens {
            for c in self.symbol(token).chars() {
                text.push(if c == self.boundary_marker { ' ' } else { c });
            }
        }
        if text.len() > start && text.ends_with(' ') {
            text.pop();
        }
        Ok(())
    }
}
