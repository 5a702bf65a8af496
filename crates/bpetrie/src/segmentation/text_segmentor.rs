//! # Text Segmentor

use core::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::{BPTError, BPTResult, DEFAULT_BOUNDARY_MARKER};

/// Word split pattern: maximal runs of non-whitespace.
pub const WORD_PATTERN: &str = r"\S+";

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(WORD_PATTERN).expect("word pattern is valid"));

/// Whitespace word splitter with a per-word boundary marker.
///
/// The marker must never occur in input text; decoding turns every marker back
/// into a space. [`TextSegmentor::check_text`] rejects text which contains it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSegmentor {
    boundary_marker: char,
}

impl Default for TextSegmentor {
    fn default() -> Self {
        Self::new(DEFAULT_BOUNDARY_MARKER)
    }
}

impl TextSegmentor {
    /// Create a new text segmentor.
    ///
    /// ## Arguments
    /// * `boundary_marker` - The symbol appended to every word.
    ///
    /// ## Returns
    /// A new `TextSegmentor` instance.
    pub fn new(boundary_marker: char) -> Self {
        Self { boundary_marker }
    }

    /// Get the boundary marker.
    pub fn boundary_marker(&self) -> char {
        self.boundary_marker
    }

    /// Check that `text` does not contain the boundary marker.
    ///
    /// ## Returns
    /// [`BPTError::MarkerInText`] if it does.
    pub fn check_text(
        &self,
        text: &str,
    ) -> BPTResult<()> {
        if text.contains(self.boundary_marker) {
            return Err(BPTError::MarkerInText {
                marker: self.boundary_marker,
            });
        }
        Ok(())
    }

    /// Iterate over the byte ranges of the words in `text`.
    pub fn word_spans<'a>(
        &self,
        text: &'a str,
    ) -> impl Iterator<Item = Range<usize>> + 'a {
        WORD_RE.find_iter(text).map(|m| m.range())
    }

    /// Iterate over the (unmarked) words in `text`.
    pub fn split_words<'a>(
        &self,
        text: &'a str,
    ) -> impl Iterator<Item = &'a str> + 'a {
        WORD_RE.find_iter(text).map(|m| m.as_str())
    }

    /// Append the boundary marker to a word.
    pub fn mark_word(
        &self,
        word: &str,
    ) -> String {
        let mut marked = String::with_capacity(word.len() + self.boundary_marker.len_utf8());
        marked.push_str(word);
        marked.push(self.boundary_marker);
        marked
    }

    /// Append the characters of a marked word to `buf`.
    ///
    /// ## Arguments
    /// * `word` - The unmarked word.
    /// * `buf` - The target buffer to append to.
    pub fn append_marked_chars(
        &self,
        word: &str,
        buf: &mut Vec<char>,
    ) {
        buf.extend(word.chars());
        buf.push(self.boundary_marker);
    }

    /// Split text into boundary-marked words.
    ///
    /// ## Arguments
    /// * `text` - The text to split.
    ///
    /// ## Returns
    /// A vector of marked words; empty if `text` holds no words.
    pub fn split_marked_words(
        &self,
        text: &str,
    ) -> Vec<String> {
        self.split_words(text)
            .map(|word| self.mark_word(word))
            .collect()
    }

    /// Rewrite text into its whitespace-normalized form.
    ///
    /// Words are re-joined with single spaces; leading and trailing
    /// whitespace is dropped. This is the form that decoding reproduces.
    pub fn rewrite<S: AsRef<str>>(
        &self,
        text: S,
    ) -> String {
        self.split_words(text.as_ref())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_spans() {
        let segmentor = TextSegmentor::default();
        let buf = "  hello\tworld\n\n!";

        assert_eq!(
            segmentor.word_spans(buf).collect::<Vec<_>>(),
            vec![2..7, 8..13, 15..16]
        );
        assert_eq!(
            segmentor.split_words(buf).collect::<Vec<_>>(),
            vec!["hello", "world", "!"]
        );
    }

    #[test]
    fn test_split_marked_words() {
        let segmentor = TextSegmentor::new('_');

        assert_eq!(
            segmentor.split_marked_words("low  lower"),
            vec!["low_".to_string(), "lower_".to_string()]
        );
        assert!(segmentor.split_marked_words("").is_empty());
        assert!(segmentor.split_marked_words(" \t\n").is_empty());
    }

    #[test]
    fn test_append_marked_chars() {
        let segmentor = TextSegmentor::default();
        assert_eq!(segmentor.boundary_marker(), '\u{2581}');

        let mut buf = vec!['x'];
        segmentor.append_marked_chars("ab", &mut buf);
        assert_eq!(buf, vec!['x', 'a', 'b', '\u{2581}']);
    }

    #[test]
    fn test_check_text() {
        let segmentor = TextSegmentor::default();

        assert!(segmentor.check_text("a b c").is_ok());
        assert!(segmentor.check_text("").is_ok());
        assert!(matches!(
            segmentor.check_text("a\u{2581}b c"),
            Err(BPTError::MarkerInText { marker: '\u{2581}' })
        ));
        assert!(TextSegmentor::new('_').check_text("a\u{2581}b").is_ok());
    }

    #[test]
    fn test_rewrite() {
        let segmentor = TextSegmentor::default();

        assert_eq!(segmentor.rewrite("  hello \n world! "), "hello world!");
        assert_eq!(segmentor.rewrite(""), "");
    }
}
