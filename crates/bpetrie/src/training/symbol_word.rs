//! # Symbol Words

use crate::types::{Pair, Symbol};

/// A training word, as an ordered sequence of symbols.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolWord {
    symbols: Vec<Symbol>,
}

impl<S: Into<Symbol>> FromIterator<S> for SymbolWord {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            symbols: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl SymbolWord {
    /// Create a new word with one symbol per character.
    pub fn from_chars<S: AsRef<str>>(s: S) -> Self {
        s.as_ref()
            .chars()
            .map(|c| {
                let mut buf = [0u8; 4];
                Symbol::new(c.encode_utf8(&mut buf))
            })
            .collect()
    }

    /// Get the symbols that make up this word.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Get the number of symbols in this word.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Get an iterator over adjacent pairs in this word.
    pub fn pairs(&self) -> impl Iterator<Item = Pair> + '_ {
        self.symbols
            .windows(2)
            .map(|w| (w[0].clone(), w[1].clone()))
    }

    /// Reduce the capacity of the internal vector to fit its contents.
    pub fn shrink_to_fit(&mut self) {
        self.symbols.shrink_to_fit();
    }

    const INC: i32 = 1;
    const DEC: i32 = -1;

    /// Merge all non-overlapping occurrences of `pair -> replacement`, left to right.
    ///
    /// In a run of equal symbols, the leftmost pairs win; `a a a` becomes `aa a`.
    ///
    /// ## Arguments
    /// * `pair` - the pair to merge.
    /// * `replacement` - the symbol to replace `pair` with.
    /// * `on_merge` - a callback function to invoke for each incremental pair delta.
    ///   The function is called with:
    ///   - `pair` - the affected pair.
    ///   - `delta` - the pair count delta: `+1` for an added pair, `-1` for a removed pair.
    ///
    /// ## Returns
    /// The number of occurrences merged.
    pub fn merge_pair_cb<F>(
        &mut self,
        pair: &Pair,
        replacement: &Symbol,
        on_merge: &mut F,
    ) -> usize
    where
        F: FnMut(Pair, i32),
    {
        let (a, b) = pair;
        let n = self.symbols.len();

        if n < 2 {
            return 0;
        }

        let mut merged = 0;
        let mut new_symbols: Vec<Symbol> = Vec::with_capacity(n);

        let mut i = 0;
        while i < n {
            let current = &self.symbols[i];

            if i + 1 < n && current == a && &self.symbols[i + 1] == b {
                // Remove Previous Pair?
                if let Some(x) = new_symbols.last() {
                    on_merge((x.clone(), a.clone()), Self::DEC);
                    on_merge((x.clone(), replacement.clone()), Self::INC);
                }

                // Remove Current Pair.
                on_merge(pair.clone(), Self::DEC);

                // Remove Next Pair?
                if i + 2 < n {
                    let y = &self.symbols[i + 2];
                    on_merge((b.clone(), y.clone()), Self::DEC);
                    on_merge((replacement.clone(), y.clone()), Self::INC);
                }

                new_symbols.push(replacement.clone());
                merged += 1;

                // Skip 'a' and 'b'.
                i += 2;
            } else {
                new_symbols.push(current.clone());
                i += 1;
            }
        }

        self.symbols = new_symbols;
        merged
    }

    /// Merge all non-overlapping occurrences of `pair -> replacement`.
    ///
    /// ## Returns
    /// a delta list of pair count deltas for this word:
    /// * `(Pair, +1)` - for each instance of an added `Pair`.
    /// * `(Pair, -1)` - for each instance of a removed `Pair`.
    pub fn merge_pair(
        &mut self,
        pair: &Pair,
        replacement: &Symbol,
    ) -> Vec<(Pair, i32)> {
        let mut deltas: Vec<(Pair, i32)> = Vec::with_capacity(6);
        self.merge_pair_cb(pair, replacement, &mut |p, d| deltas.push((p, d)));
        deltas
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

    #[test]
    fn test_from_chars() {
        let word = SymbolWord::from_chars("né_");
        assert_eq!(word.symbols(), &["n", "é", "_"]);
        assert_eq!(word.len(), 3);
    }

    #[test]
    fn test_pairs() {
        let word = SymbolWord::from_chars("abc");
        assert_eq!(
            word.pairs().collect::<Vec<_>>(),
            vec![p("a", "b"), p("b", "c")]
        );

        assert_eq!(SymbolWord::from_chars("a").pairs().count(), 0);
    }

    #[test]
    fn test_merge_pair() {
        let mut word: SymbolWord = ["a", "b", "c", "a", "b", "b", "a"].into_iter().collect();

        let deltas = word.merge_pair(&p("a", "b"), &"ab".into());
        assert_eq!(word.symbols(), &["ab", "c", "ab", "b", "a"]);

        assert_eq!(
            deltas,
            vec![
                // first match
                (p("a", "b"), -1),
                (p("b", "c"), -1),
                (p("ab", "c"), 1),
                // second match
                (p("c", "a"), -1),
                (p("c", "ab"), 1),
                (p("a", "b"), -1),
                (p("b", "b"), -1),
                (p("ab", "b"), 1),
            ]
        );
    }

    #[test]
    fn test_merge_pair_overlapping_run() {
        let mut word: SymbolWord = ["a", "a", "a", "a"].into_iter().collect();

        let mut total = 0;
        let merged = word.merge_pair_cb(&p("a", "a"), &"aa".into(), &mut |pair, delta| {
            if pair == p("a", "a") {
                total += delta;
            }
        });

        assert_eq!(merged, 2);
        assert_eq!(word.symbols(), &["aa", "aa"]);
        // all three ("a", "a") pairs are gone.
        assert_eq!(total, -3);
    }

    #[test]
    fn test_merge_pair_odd_run() {
        let mut word: SymbolWord = ["b", "a", "a", "a", "_"].into_iter().collect();

        let deltas = word.merge_pair(&p("a", "a"), &"aa".into());
        assert_eq!(word.symbols(), &["b", "aa", "a", "_"]);

        assert_eq!(
            deltas,
            vec![
                (p("b", "a"), -1),
                (p("b", "aa"), 1),
                (p("a", "a"), -1),
                (p("a", "a"), -1),
                (p("aa", "a"), 1),
            ]
        );
    }

    #[test]
    fn test_merge_pair_absent() {
        let mut word = SymbolWord::from_chars("xyz");
        let deltas = word.merge_pair(&p("a", "b"), &"ab".into());
        assert!(deltas.is_empty());
        assert_eq!(word, SymbolWord::from_chars("xyz"));
    }
}
