//! # Trie Encoder

use std::sync::Arc;

use crate::{
    BPTResult,
    TokenType,
    encoders::TokenEncoder,
    segmentation::TextSegmentor,
    trie::SymbolTrie,
    vocab::SymbolVocab,
};

/// Greedy longest-match [`TokenEncoder`] with trie backtracking.
///
/// Each boundary-marked word is consumed left to right. From the current
/// position, the trie is walked as far as the text allows; the walk then
/// backs up through parent links to the nearest terminal node, whose token
/// is emitted. The next walk starts right after the emitted span.
///
/// If no terminal lies on the walked path, the first character has no
/// vocabulary entry; it is emitted as the unknown token and skipped.
#[derive(Debug, Clone)]
pub struct TrieEncoder<T: TokenType> {
    vocab: Arc<SymbolVocab<T>>,
    trie: Arc<SymbolTrie<T>>,
    segmentor: TextSegmentor,
}

impl<T: TokenType> TrieEncoder<T> {
    /// Initialize an encoder, building the trie from `vocab`.
    ///
    /// ## Arguments
    /// * `vocab` - The vocabulary to encode against.
    /// * `segmentor` - The word segmentor; its boundary marker must match training.
    pub fn init(
        vocab: Arc<SymbolVocab<T>>,
        segmentor: TextSegmentor,
    ) -> Self {
        let trie = Arc::new(SymbolTrie::from_vocab(&vocab));
        Self::new(vocab, trie, segmentor)
    }

    /// Create an encoder from a prebuilt trie.
    pub fn new(
        vocab: Arc<SymbolVocab<T>>,
        trie: Arc<SymbolTrie<T>>,
        segmentor: TextSegmentor,
    ) -> Self {
        Self {
            vocab,
            trie,
            segmentor,
        }
    }

    /// The vocabulary.
    pub fn vocab(&self) -> &Arc<SymbolVocab<T>> {
        &self.vocab
    }

    /// The symbol trie.
    pub fn trie(&self) -> &Arc<SymbolTrie<T>> {
        &self.trie
    }

    /// Encodes a single marked word.
    ///
    /// ## Arguments
    /// * `word` - The characters of the word, boundary marker included.
    /// * `tokens` - The target token buffer to append to.
    pub fn encode_append_word(
        &self,
        word: &[char],
        tokens: &mut Vec<T>,
    ) {
        let mut start = 0;
        while start < word.len() {
            let mut node = SymbolTrie::<T>::ROOT;
            let mut pos = start;

            while pos < word.len() {
                match self.trie.child(node, word[pos]) {
                    Some(child) => {
                        node = child;
                        pos += 1;
                    }
                    None => break,
                }
            }

            // Back up to the nearest terminal; `pos` tracks the node depth.
            while self.trie.token(node).is_none() {
                match self.trie.parent(node) {
                    Some(parent) => {
                        node = parent;
                        pos -= 1;
                    }
                    None => break,
                }
            }

            match self.trie.token(node) {
                Some(token) => {
                    tokens.push(token);
                    start = pos;
                }
                None => {
                    log::trace!("no vocabulary entry for {:?}", word[start]);
                    tokens.push(self.vocab.unknown_token());
                    start += 1;
                }
            }
        }
    }
}

impl<T: TokenType> TokenEncoder<T> for TrieEncoder<T> {
    fn segmentor(&self) -> &TextSegmentor {
        &self.segmentor
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "trace", skip(self, text, tokens))
    )]
    fn try_encode_append(
        &self,
        text: &str,
        tokens: &mut Vec<T>,
    ) -> BPTResult<()> {
        self.segmentor.check_text(text)?;

        let mut buf: Vec<char> = Vec::with_capacity(32);
        for word in self.segmentor.split_words(text) {
            buf.clear();
            self.segmentor.append_marked_chars(word, &mut buf);
            self.encode_append_word(&buf, tokens);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Symbol, check_is_send, check_is_sync};

    fn encoder(items: &[&str]) -> TrieEncoder<u32> {
        let vocab =
            SymbolVocab::assemble(items.iter().map(|&s| Symbol::from(s)), "<unk>").unwrap();
        TrieEncoder::init(Arc::new(vocab), TextSegmentor::new('_'))
    }

    fn symbols_of(
        encoder: &TrieEncoder<u32>,
        tokens: &[u32],
    ) -> Vec<String> {
        tokens
            .iter()
            .map(|&t| encoder.vocab().lookup_symbol(t).unwrap().to_string())
            .collect()
    }

    fn encode_word(
        encoder: &TrieEncoder<u32>,
        word: &str,
    ) -> Vec<String> {
        let chars: Vec<char> = word.chars().collect();
        let mut tokens = Vec::new();
        encoder.encode_append_word(&chars, &mut tokens);
        symbols_of(encoder, &tokens)
    }

    #[test]
    fn test_send_sync() {
        let encoder = encoder(&["a"]);
        check_is_send(&encoder);
        check_is_sync(&encoder);
    }

    #[test]
    fn test_longest_match() {
        let encoder = encoder(&["a", "b", "c", "d", "_", "ab", "abcd", "d_"]);

        assert_eq!(encode_word(&encoder, "abcd_"), vec!["abcd", "_"]);
        assert_eq!(encode_word(&encoder, "abd_"), vec!["ab", "d_"]);
        assert_eq!(encode_word(&encoder, "ba_"), vec!["b", "a", "_"]);
    }

    #[test]
    fn test_backtracks_through_dead_path() {
        let encoder = encoder(&["a", "b", "c", "_", "ab", "abcd"]);

        // "abc" is an interior node of "abcd"; back up to "ab".
        assert_eq!(encode_word(&encoder, "abc_"), vec!["ab", "c", "_"]);

        // The same when the input runs out mid-path.
        assert_eq!(encode_word(&encoder, "abc"), vec!["ab", "c"]);
    }

    #[test]
    fn test_unknown_characters() {
        let encoder = encoder(&["a", "_", "a_"]);

        let chars: Vec<char> = "xa?_".chars().collect();
        let mut tokens = Vec::new();
        encoder.encode_append_word(&chars, &mut tokens);

        let a = encoder.vocab().lookup_token("a").unwrap();
        let marker = encoder.vocab().lookup_token("_").unwrap();
        assert_eq!(tokens, vec![0, a, 0, marker]);
    }

    #[test]
    fn test_try_encode() {
        let encoder = encoder(&["l", "o", "w", "_", "lo", "low_"]);

        let tokens = encoder.try_encode("  low\tlow lo ").unwrap();
        assert_eq!(
            symbols_of(&encoder, &tokens),
            vec!["low_", "low_", "lo", "_"]
        );

        assert!(encoder.try_encode("").unwrap().is_empty());
        assert!(encoder.try_encode(" \n ").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_boundary_marker() {
        let encoder = encoder(&["a", "b", "_", "a_"]);
        assert!(matches!(
            encoder.try_encode("a_b a"),
            Err(crate::BPTError::MarkerInText { marker: '_' })
        ));
        assert!(encoder.try_encode_batch(&["a", "b_"]).is_err());
    }

    #[test]
    fn test_dyn_encoder() {
        let inner = encoder(&["l", "o", "w", "_", "lo", "low_"]);
        let expected = inner.try_encode("low lo").unwrap();

        let encoder: Box<dyn TokenEncoder<u32>> = Box::new(inner);
        assert_eq!(encoder.segmentor().boundary_marker(), '_');
        assert_eq!(encoder.try_encode("low lo").unwrap(), expected);
    }

    #[test]
    fn test_try_encode_batch() {
        let encoder = encoder(&["l", "o", "w", "_", "lo", "low_"]);

        let batch = ["low", "", "lo low"];
        let tokens = encoder.try_encode_batch(&batch).unwrap();
        assert_eq!(tokens.len(), 3);
        for (text, tokens) in batch.iter().zip(tokens.iter()) {
            assert_eq!(tokens, &encoder.try_encode(text).unwrap());
        }
    }
}
