//! # Vocab Trainer

use core::{cmp::Ordering, num::NonZeroUsize};
use std::collections::{BTreeMap, BTreeSet};

use ahash::{AHashMap, AHashSet};
use dary_heap::OctonaryHeap;
use serde::{Deserialize, Serialize};

use crate::{
    BPTError,
    BPTResult,
    DEFAULT_BOUNDARY_MARKER,
    DEFAULT_PARALLEL,
    DEFAULT_UNKNOWN_SYMBOL,
    segmentation::TextSegmentor,
    training::{PairIndex, PairIndexOptions, SymbolWord, WordCounter},
    types::{CountType, Pair, Symbol, TokenType, merge_symbol},
    vocab::SymbolVocab,
};

/// When the merge loop has produced enough.
///
/// The two modes are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopMode {
    /// Stop once the assembled vocabulary (including the unknown token) would hold this many entries.
    TargetVocabSize(usize),

    /// Stop after this many merges.
    MergeCount(usize),
}

fn default_boundary_marker() -> char {
    DEFAULT_BOUNDARY_MARKER
}

fn default_unknown_symbol() -> String {
    DEFAULT_UNKNOWN_SYMBOL.to_string()
}

fn default_parallel() -> bool {
    DEFAULT_PARALLEL
}

/// Options for [`BytePairTrainer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BytePairTrainerOptions {
    /// The primary stop condition.
    pub stop_mode: StopMode,

    /// Stop when the best remaining pair occurs fewer than this many times.
    #[serde(default)]
    pub min_pair_frequency: Option<u64>,

    /// Hard cap on the number of merges, independent of `stop_mode`.
    #[serde(default)]
    pub max_merges: Option<usize>,

    /// Log progress every this many merges.
    ///
    /// This has no effect on the trained vocabulary.
    #[serde(default)]
    pub progress_report_interval: Option<NonZeroUsize>,

    /// The symbol appended to every word.
    #[serde(default = "default_boundary_marker")]
    pub boundary_marker: char,

    /// The symbol for the reserved unknown token (id 0).
    #[serde(default = "default_unknown_symbol")]
    pub unknown_symbol: String,

    /// Use ``rayon`` to build the initial pair index.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl BytePairTrainerOptions {
    /// Create new options with the given stop mode, and defaults elsewhere.
    pub fn new(stop_mode: StopMode) -> Self {
        Self {
            stop_mode,
            min_pair_frequency: None,
            max_merges: None,
            progress_report_interval: None,
            boundary_marker: default_boundary_marker(),
            unknown_symbol: default_unknown_symbol(),
            parallel: default_parallel(),
        }
    }

    /// Create new options in [`StopMode::TargetVocabSize`] mode.
    pub fn with_target_vocab_size(target_vocab_size: usize) -> Self {
        Self::new(StopMode::TargetVocabSize(target_vocab_size))
    }

    /// Create new options in [`StopMode::MergeCount`] mode.
    pub fn with_merge_count(merge_count: usize) -> Self {
        Self::new(StopMode::MergeCount(merge_count))
    }

    /// Sets the stop mode.
    pub fn with_stop_mode(
        self,
        stop_mode: StopMode,
    ) -> Self {
        Self { stop_mode, ..self }
    }

    /// Sets the minimum pair frequency.
    pub fn with_min_pair_frequency(
        self,
        min_pair_frequency: u64,
    ) -> Self {
        Self {
            min_pair_frequency: Some(min_pair_frequency),
            ..self
        }
    }

    /// Sets the merge cap.
    pub fn with_max_merges(
        self,
        max_merges: usize,
    ) -> Self {
        Self {
            max_merges: Some(max_merges),
            ..self
        }
    }

    /// Sets the progress report interval; `0` disables progress reports.
    pub fn with_progress_report_interval(
        self,
        interval: usize,
    ) -> Self {
        Self {
            progress_report_interval: NonZeroUsize::new(interval),
            ..self
        }
    }

    /// Sets the boundary marker.
    pub fn with_boundary_marker(
        self,
        boundary_marker: char,
    ) -> Self {
        Self {
            boundary_marker,
            ..self
        }
    }

    /// Sets the unknown symbol.
    pub fn with_unknown_symbol<S: Into<String>>(
        self,
        unknown_symbol: S,
    ) -> Self {
        Self {
            unknown_symbol: unknown_symbol.into(),
            ..self
        }
    }

    /// Sets the parallel pair-indexing flag.
    pub fn with_parallel(
        self,
        parallel: bool,
    ) -> Self {
        Self { parallel, ..self }
    }

    /// The segmentor described by these options.
    pub fn segmentor(&self) -> TextSegmentor {
        TextSegmentor::new(self.boundary_marker)
    }

    /// Initializes a [`BytePairTrainer`] from these options.
    ///
    /// ## Parameters
    /// * `C` - the type used to store word and pair counts.
    pub fn init<C: CountType>(self) -> BytePairTrainer<C> {
        BytePairTrainer::init(self)
    }
}

/// Info about a [`Pair`] that could be merged.
#[derive(Debug, Clone, Eq)]
pub struct MergeJob<C: CountType> {
    /// The number of instances of this pair in the corpus.
    pub count: C,

    /// The pair to merge.
    pub pair: Pair,

    /// The symbol the pair merges into.
    pub merged: Symbol,
}

impl<C: CountType> MergeJob<C> {
    fn new(
        pair: Pair,
        count: C,
    ) -> Self {
        let merged = merge_symbol(&pair);
        Self {
            count,
            pair,
            merged,
        }
    }

    /// Compare two jobs by priority.
    ///
    /// Max-heap by count; ties go to the lexicographically smallest merged symbol,
    /// then to the smallest pair.
    fn priority_cmp(
        &self,
        other: &Self,
    ) -> Ordering {
        self.count
            .cmp(&other.count)
            .then_with(|| other.merged.cmp(&self.merged))
            .then_with(|| other.pair.cmp(&self.pair))
    }
}

impl<C: CountType> PartialEq for MergeJob<C> {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.priority_cmp(other) == Ordering::Equal
    }
}

impl<C: CountType> PartialOrd for MergeJob<C> {
    fn partial_cmp(
        &self,
        other: &Self,
    ) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C: CountType> Ord for MergeJob<C> {
    fn cmp(
        &self,
        other: &Self,
    ) -> Ordering {
        self.priority_cmp(other)
    }
}

/// Why the merge loop stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// [`StopMode::TargetVocabSize`] was reached.
    TargetVocabSizeReached,

    /// [`StopMode::MergeCount`] merges were performed.
    MergeCountReached,

    /// The best remaining pair was below `min_pair_frequency`.
    BelowMinPairFrequency {
        /// The pair that would have been merged next.
        pair: Pair,

        /// Its count.
        count: u64,
    },

    /// The `max_merges` cap was exhausted.
    MaxMergesReached,

    /// No mergeable pairs remain.
    PairsExhausted,
}

/// A single learned merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRecord {
    /// The merged pair.
    pub pair: Pair,

    /// The new symbol.
    pub merged: Symbol,

    /// The pair count at merge time.
    pub count: u64,
}

/// Training summary, kept for inspection and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingReport {
    /// Merges, in the order they were applied.
    pub merges: Vec<MergeRecord>,

    /// Why training stopped.
    pub stop_reason: StopReason,

    /// Weighted symbol frequencies over the final segmented corpus.
    pub symbol_counts: BTreeMap<Symbol, u64>,
}

/// The product of [`BytePairTrainer::train`].
#[derive(Debug, Clone)]
pub struct TrainResults<T: TokenType> {
    /// The assembled vocabulary.
    pub vocab: SymbolVocab<T>,

    /// The training summary.
    pub report: TrainingReport,
}

/// Tracks the distinct symbols of the current segmentation, over a fixed alphabet.
///
/// `len()` is the number of learned symbols a vocabulary assembled right now would hold.
#[derive(Debug, Clone)]
struct SymbolTally<C: CountType> {
    alphabet: BTreeSet<Symbol>,
    counts: AHashMap<Symbol, C>,
    extra: usize,
}

impl<C: CountType> SymbolTally<C> {
    fn init(
        alphabet: BTreeSet<Symbol>,
        words: &[SymbolWord],
        word_counts: &[C],
    ) -> Self {
        let mut tally = Self {
            alphabet,
            counts: AHashMap::new(),
            extra: 0,
        };
        for (word, &count) in words.iter().zip(word_counts.iter()) {
            for symbol in word.symbols() {
                tally.add(symbol, count);
            }
        }
        tally
    }

    fn len(&self) -> usize {
        self.alphabet.len() + self.extra
    }

    fn add(
        &mut self,
        symbol: &Symbol,
        count: C,
    ) {
        let entry = self.counts.entry(symbol.clone()).or_default();
        if entry.is_zero() && !self.alphabet.contains(symbol) {
            self.extra += 1;
        }
        *entry += count;
    }

    fn sub(
        &mut self,
        symbol: &Symbol,
        count: C,
    ) {
        if let Some(entry) = self.counts.get_mut(symbol) {
            *entry -= count;
            if entry.is_zero() {
                self.counts.remove(symbol);
                if !self.alphabet.contains(symbol) {
                    self.extra -= 1;
                }
            }
        }
    }

    /// Account for `times` merges of `pair` in a word occurring `word_count` times.
    fn record_merge(
        &mut self,
        pair: &Pair,
        merged: &Symbol,
        word_count: C,
        times: usize,
    ) {
        for _ in 0..times {
            self.add(merged, word_count);
            self.sub(&pair.0, word_count);
            self.sub(&pair.1, word_count);
        }
    }
}

/// Trainer for learning byte-pair symbol vocabularies.
///
/// ## Parameters
/// * `C` - the type used to store word and pair counts.
#[derive(Debug, Clone)]
pub struct BytePairTrainer<C: CountType = u64> {
    /// Trainer options.
    pub options: BytePairTrainerOptions,

    /// The word counter.
    pub word_counter: WordCounter<C>,
}

impl<C: CountType> BytePairTrainer<C> {
    /// Initializes a [`BytePairTrainer`].
    pub fn init(options: BytePairTrainerOptions) -> Self {
        let word_counter = WordCounter::new(options.segmentor());
        Self {
            options,
            word_counter,
        }
    }

    /// Update the word counts inplace from a text string.
    pub fn update_from_text<S: AsRef<str>>(
        &mut self,
        text: S,
    ) {
        self.word_counter.update_from_text(text);
    }

    /// Update word counts inplace from a sample iterator.
    pub fn update_from_samples<I>(
        &mut self,
        samples: I,
    ) where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.word_counter.update_from_samples(samples);
    }

    fn check_target(
        &self,
        merges_done: usize,
        num_symbols: usize,
    ) -> Option<StopReason> {
        match self.options.stop_mode {
            // +1 for the unknown token.
            StopMode::TargetVocabSize(target) if num_symbols + 1 >= target => {
                Some(StopReason::TargetVocabSizeReached)
            }
            StopMode::MergeCount(count) if merges_done >= count => {
                Some(StopReason::MergeCountReached)
            }
            _ => match self.options.max_merges {
                Some(max) if merges_done >= max => Some(StopReason::MaxMergesReached),
                _ => None,
            },
        }
    }

    /// Trains a [`SymbolVocab<T>`].
    ///
    /// The resulting vocab will contain:
    /// * the unknown symbol, as token 0,
    /// * every character seen, and the boundary marker,
    /// * every symbol present in the final segmentation of the corpus.
    ///
    /// Under [`StopMode::TargetVocabSize`], if the target is never reached, the
    /// learned merges are cut back to the shortest prefix which produced the
    /// largest vocabulary seen.
    ///
    /// ## Parameters
    /// * `T` - the [`TokenType`] of the trained vocab.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub fn train<T: TokenType>(self) -> BPTResult<TrainResults<T>> {
        if self.word_counter.is_empty() {
            return Err(BPTError::EmptyVocabulary);
        }

        let alphabet: BTreeSet<Symbol> = self
            .word_counter
            .alphabet()
            .iter()
            .map(|&c| {
                let mut buf = [0u8; 4];
                Symbol::new(c.encode_utf8(&mut buf))
            })
            .collect();

        if alphabet.contains(self.options.unknown_symbol.as_str()) {
            return Err(BPTError::InvalidVocab(format!(
                "unknown symbol {:?} occurs in the training text",
                self.options.unknown_symbol
            )));
        }

        let (mut words, word_counts) = self.word_counter.to_word_count_table();
        let mut tally = SymbolTally::init(alphabet, &words, &word_counts);
        log::info!(
            "Starting BPE training: {} unique words, {} initial symbols, stop mode {:?}",
            words.len(),
            tally.len(),
            self.options.stop_mode
        );

        log::info!("Building pair index...");
        let PairIndex {
            mut pair_counts,
            mut pair_to_word_index,
        } = PairIndex::index_unique_word_counts_table(
            &words,
            &word_counts,
            PairIndexOptions::default().with_parallel(self.options.parallel),
        );

        let zero = C::zero();

        // ---- Build heap ----
        log::info!("Building heap with {} unique pairs", pair_counts.len());
        let mut heap = OctonaryHeap::with_capacity(pair_counts.len());
        for (pair, &count) in pair_counts.iter() {
            if count > zero {
                heap.push(MergeJob::new(pair.clone(), count));
            }
        }

        // (vocab size, merges done) of the earliest, largest vocabulary.
        let mut largest = (tally.len(), 0);

        // ---- Merge loop ----
        let mut merges: Vec<MergeRecord> = Vec::new();
        let stop_reason = loop {
            if let Some(reason) = self.check_target(merges.len(), tally.len()) {
                break reason;
            }

            let Some(mut job) = heap.pop() else {
                break StopReason::PairsExhausted;
            };

            {
                // Lazy refresh the job count.
                let current = pair_counts.get(&job.pair).copied().unwrap_or(zero);
                if job.count != current {
                    job.count = current;
                    if job.count > zero {
                        heap.push(job);
                    }
                    continue;
                }
            }

            let count = job.count.to_u64().unwrap_or(u64::MAX);
            if let Some(min) = self.options.min_pair_frequency
                && count < min
            {
                break StopReason::BelowMinPairFrequency {
                    pair: job.pair,
                    count,
                };
            }

            // Merge this pair in all words where it may occur.
            let mut word_indices: Vec<usize> = pair_to_word_index
                .remove(&job.pair)
                .unwrap_or_default()
                .into_iter()
                .collect();
            word_indices.sort_unstable();

            let mut touched: AHashSet<Pair> = AHashSet::with_capacity(16);
            for word_idx in word_indices {
                let word_count = word_counts[word_idx];
                let merged =
                    words[word_idx].merge_pair_cb(&job.pair, &job.merged, &mut |pair, delta| {
                        if delta < 0 {
                            *pair_counts.entry(pair).or_default() -= word_count;
                        } else {
                            *pair_counts.entry(pair.clone()).or_default() += word_count;
                            pair_to_word_index
                                .entry(pair.clone())
                                .or_default()
                                .insert(word_idx);
                            touched.insert(pair);
                        }
                    });
                tally.record_merge(&job.pair, &job.merged, word_count, merged);
            }
            pair_counts.remove(&job.pair);

            // Add the updated pair counts back to the heap.
            for pair in touched {
                let count = pair_counts.get(&pair).copied().unwrap_or(zero);
                if count > zero {
                    heap.push(MergeJob::new(pair, count));
                }
            }

            log::debug!(
                "merge {}: {:?} -> {:?} (frequency: {})",
                merges.len() + 1,
                job.pair,
                job.merged,
                count
            );
            merges.push(MergeRecord {
                pair: job.pair,
                merged: job.merged,
                count,
            });
            if tally.len() > largest.0 {
                largest = (tally.len(), merges.len());
            }

            if let Some(interval) = self.options.progress_report_interval
                && merges.len() % interval.get() == 0
            {
                log::info!(
                    "Progress: {} merges, {} symbols - last merge frequency: {}",
                    merges.len(),
                    tally.len(),
                    count
                );
            }
        };

        if matches!(self.options.stop_mode, StopMode::TargetVocabSize(_))
            && stop_reason != StopReason::TargetVocabSizeReached
            && largest.1 < merges.len()
        {
            log::info!(
                "Target not reached; keeping the first {} of {} merges ({} symbols)",
                largest.1,
                merges.len(),
                largest.0
            );
            merges.truncate(largest.1);

            let (replayed, _) = self.word_counter.to_word_count_table();
            words = replayed;
            for merge in &merges {
                for word in words.iter_mut() {
                    word.merge_pair_cb(&merge.pair, &merge.merged, &mut |_, _| {});
                }
            }
        }

        log::info!(
            "Finished training: {} merges completed ({:?})",
            merges.len(),
            stop_reason
        );

        let mut symbol_counts: BTreeMap<Symbol, u64> = BTreeMap::new();
        for (word, &word_count) in words.iter().zip(word_counts.iter()) {
            let word_count = word_count.to_u64().unwrap_or(u64::MAX);
            for symbol in word.symbols() {
                *symbol_counts.entry(symbol.clone()).or_default() += word_count;
            }
        }

        let symbols = tally
            .alphabet
            .into_iter()
            .chain(symbol_counts.keys().cloned());
        let vocab = SymbolVocab::assemble(symbols, &self.options.unknown_symbol)?;

        Ok(TrainResults {
            vocab,
            report: TrainingReport {
                merges,
                stop_reason,
                symbol_counts,
            },
        })
    }
}
