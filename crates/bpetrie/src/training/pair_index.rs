//! # Pair Count / Word Indexing

use ahash::{AHashMap, AHashSet};

use crate::{
    training::SymbolWord,
    types::{CountType, Pair},
};

/// Options for building a [`PairIndex`].
#[derive(Debug, Clone, Copy)]
pub struct PairIndexOptions {
    /// Whether to use parallel processing for indexing.
    ///
    /// Requires the `rayon` feature to be enabled.
    pub parallel: bool,
}

impl Default for PairIndexOptions {
    fn default() -> Self {
        Self {
            parallel: crate::DEFAULT_PARALLEL,
        }
    }
}

impl PairIndexOptions {
    /// Sets the parallel processing flag.
    pub fn with_parallel(
        self,
        parallel: bool,
    ) -> Self {
        Self { parallel }
    }
}

/// An index of [`Pair`]s over an index set of ``(word, count)``.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PairIndex<C: CountType> {
    /// A map from [`Pair`] to its weighted occurrence count.
    ///
    /// ``sum(words[i].count(pair) * word_counts[i]) for all i``
    pub pair_counts: AHashMap<Pair, C>,

    /// A map from [`Pair`] to indices over ``words``.
    pub pair_to_word_index: AHashMap<Pair, AHashSet<usize>>,
}

impl<C: CountType> PairIndex<C> {
    /// Build a [`PairIndex`] from a slice of [`SymbolWord`]s, using a count table.
    ///
    /// ## Arguments
    /// * `words` - the slice of words; Words are assumed to be unique.
    /// * `word_counts` - `word_counts[i]` is the count of `words[i]`.
    /// * `options` - options for building the index.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip(words, word_counts))
    )]
    pub fn index_unique_word_counts_table(
        words: &[SymbolWord],
        word_counts: &[C],
        options: PairIndexOptions,
    ) -> Self {
        if options.parallel {
            #[cfg(feature = "rayon")]
            return Self::index_unique_word_counts_table_rayon(words, word_counts);

            #[cfg(not(feature = "rayon"))]
            log::warn!("parallel pair indexing requested without the `rayon` feature");
        }
        Self::index_unique_word_counts_table_serial(words, word_counts)
    }

    fn observe_word(
        &mut self,
        index: usize,
        word: &SymbolWord,
        word_count: C,
    ) {
        if word_count != C::zero() && word.len() >= 2 {
            for p in word.pairs() {
                *self.pair_counts.entry(p.clone()).or_default() += word_count;
                self.pair_to_word_index.entry(p).or_default().insert(index);
            }
        }
    }

    /// Build a [`PairIndex`] serially.
    ///
    /// ## Arguments
    /// * `words` - the slice of words; Words are assumed to be unique.
    /// * `word_counts` - `word_counts[i]` is the count of `words[i]`.
    pub fn index_unique_word_counts_table_serial(
        words: &[SymbolWord],
        word_counts: &[C],
    ) -> Self {
        let mut index = Self::default();
        for (word_index, word) in words.iter().enumerate() {
            index.observe_word(word_index, word, word_counts[word_index]);
        }
        index
    }

    /// Build a [`PairIndex`] with a ``rayon`` map-reduce over words.
    ///
    /// The result is identical to [`Self::index_unique_word_counts_table_serial`].
    ///
    /// ## Arguments
    /// * `words` - the slice of words; Words are assumed to be unique.
    /// * `word_counts` - `word_counts[i]` is the count of `words[i]`.
    #[cfg(feature = "rayon")]
    pub fn index_unique_word_counts_table_rayon(
        words: &[SymbolWord],
        word_counts: &[C],
    ) -> Self {
        use rayon::prelude::*;

        words
            .par_iter()
            .enumerate()
            .fold(Self::default, |mut acc, (word_index, word)| {
                acc.observe_word(word_index, word, word_counts[word_index]);
                acc
            })
            .reduce(Self::default, |mut acc, other| {
                acc.merge_from(other);
                acc
            })
    }

    fn merge_from(
        &mut self,
        other: Self,
    ) {
        for (k, v) in other.pair_counts {
            *self.pair_counts.entry(k).or_default() += v;
        }
        for (k, s) in other.pair_to_word_index {
            self.pair_to_word_index.entry(k).or_default().extend(s);
        }
    }

    /// The count of a pair; zero if absent.
    pub fn count(
        &self,
        pair: &Pair,
    ) -> C {
        self.pair_counts.get(pair).copied().unwrap_or_else(C::zero)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(
        a: &str,
        b: &str,
    ) -> Pair {
        (a.into(), b.into())
    }

    fn sample_table() -> (Vec<SymbolWord>, Vec<u32>) {
        (
            vec![
                SymbolWord::from_chars("low_"),
                SymbolWord::from_chars("lower_"),
                SymbolWord::from_chars("newest_"),
                SymbolWord::from_chars("x"),
            ],
            vec![5, 2, 6, 9],
        )
    }

    #[test]
    fn test_serial_index() {
        let (words, counts) = sample_table();
        let index = PairIndex::index_unique_word_counts_table_serial(&words, &counts);

        assert_eq!(index.count(&p("l", "o")), 7);
        assert_eq!(index.count(&p("o", "w")), 7);
        assert_eq!(index.count(&p("w", "_")), 5);
        assert_eq!(index.count(&p("e", "w")), 6);
        assert_eq!(index.count(&p("s", "t")), 6);
        assert_eq!(index.count(&p("x", "_")), 0);

        assert_eq!(
            index.pair_to_word_index[&p("o", "w")],
            AHashSet::from_iter([0, 1])
        );
        assert_eq!(
            index.pair_to_word_index[&p("w", "e")],
            AHashSet::from_iter([1, 2])
        );
    }

    #[test]
    fn test_zero_count_words_are_skipped() {
        let words = vec![SymbolWord::from_chars("ab")];
        let index = PairIndex::index_unique_word_counts_table_serial(&words, &[0u32]);
        assert!(index.pair_counts.is_empty());
        assert!(index.pair_to_word_index.is_empty());
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn test_rayon_matches_serial() {
        let (words, counts) = sample_table();

        let serial = PairIndex::index_unique_word_counts_table_serial(&words, &counts);
        let parallel = PairIndex::index_unique_word_counts_table(
            &words,
            &counts,
            PairIndexOptions::default().with_parallel(true),
        );

        assert_eq!(serial, parallel);
    }
}
