//! # Word Counter

use std::collections::BTreeSet;

use ahash::AHashMap;
use compact_str::CompactString;

use crate::{CountType, segmentation::TextSegmentor, training::SymbolWord};

/// Counts boundary-marked words over a stream of text samples.
#[derive(Debug, Clone)]
pub struct WordCounter<C: CountType> {
    segmentor: TextSegmentor,
    word_counts: AHashMap<CompactString, C>,
}

impl<C: CountType> WordCounter<C> {
    /// Create a new, empty, word counter.
    pub fn new(segmentor: TextSegmentor) -> Self {
        Self {
            segmentor,
            word_counts: Default::default(),
        }
    }

    /// The segmentor used to split samples.
    pub fn segmentor(&self) -> &TextSegmentor {
        &self.segmentor
    }

    /// The number of unique words seen.
    pub fn len(&self) -> usize {
        self.word_counts.len()
    }

    /// Returns true if no words have been seen.
    pub fn is_empty(&self) -> bool {
        self.word_counts.is_empty()
    }

    /// Get the count of a marked word.
    pub fn get(
        &self,
        marked_word: &str,
    ) -> Option<C> {
        self.word_counts.get(marked_word).copied()
    }

    /// Update the word counts inplace from a text string.
    pub fn update_from_text<S: AsRef<str>>(
        &mut self,
        text: S,
    ) {
        let one = C::one();
        for word in self.segmentor.split_words(text.as_ref()) {
            let marked = CompactString::from(self.segmentor.mark_word(word));
            *self.word_counts.entry(marked).or_default() += one;
        }
    }

    /// Update word counts inplace from a sample iterator.
    pub fn update_from_samples<I>(
        &mut self,
        samples: I,
    ) where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for sample in samples {
            self.update_from_text(sample);
        }
    }

    /// Every distinct character seen, plus the boundary marker.
    pub fn alphabet(&self) -> BTreeSet<char> {
        let mut alphabet: BTreeSet<char> = self
            .word_counts
            .keys()
            .flat_map(|word| word.chars())
            .collect();
        alphabet.insert(self.segmentor.boundary_marker());
        alphabet
    }

    /// Convert to a ``(words, counts)`` table of single-character symbol words.
    ///
    /// The table is sorted by word, so that word indices are stable across runs.
    pub fn to_word_count_table(&self) -> (Vec<SymbolWord>, Vec<C>) {
        let mut entries: Vec<(&CompactString, C)> = self
            .word_counts
            .iter()
            .map(|(word, &count)| (word, count))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));

        entries
            .into_iter()
            .map(|(word, count)| (SymbolWord::from_chars(word), count))
            .unzip()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_from_samples() {
        let mut counter = WordCounter::<u32>::new(TextSegmentor::new('_'));
        assert!(counter.is_empty());

        counter.update_from_samples(["low lower", "low\tnewest", ""]);

        assert_eq!(counter.len(), 3);
        assert_eq!(counter.get("low_"), Some(2));
        assert_eq!(counter.get("lower_"), Some(1));
        assert_eq!(counter.get("newest_"), Some(1));
        assert_eq!(counter.get("low"), None);
    }

    #[test]
    fn test_alphabet() {
        let mut counter = WordCounter::<u32>::new(TextSegmentor::new('_'));
        assert_eq!(counter.alphabet(), BTreeSet::from(['_']));

        counter.update_from_text("ab ba c");
        assert_eq!(counter.alphabet(), BTreeSet::from(['_', 'a', 'b', 'c']));
    }

    #[test]
    fn test_to_word_count_table() {
        let mut counter = WordCounter::<u64>::new(TextSegmentor::new('_'));
        counter.update_from_samples(["ba ab ab"]);

        let (words, counts) = counter.to_word_count_table();
        assert_eq!(
            words,
            vec![
                SymbolWord::from_chars("ab_"),
                SymbolWord::from_chars("ba_"),
            ]
        );
        assert_eq!(counts, vec![2, 1]);
    }
}
