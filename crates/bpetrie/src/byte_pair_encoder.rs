//! # Byte Pair Encoder
//!
//! The fit / transform / inverse-transform facade over training, encoding and decoding.

use std::{path::Path, sync::Arc};

use crate::{
    BPTError,
    BPTResult,
    TokenType,
    decoders::{SymbolDecoder, TokenDecoder},
    encoders::{TokenEncoder, TrieEncoder},
    training::{BytePairTrainerOptions, TrainResults, TrainingReport},
    vocab::{SymbolVocab, io::save_base64_vocab_path},
};

/// Everything produced by a successful fit.
#[derive(Debug, Clone)]
struct FittedState<T: TokenType> {
    vocab: Arc<SymbolVocab<T>>,
    encoder: TrieEncoder<T>,
    decoder: SymbolDecoder<T>,
    report: Option<TrainingReport>,
}

impl<T: TokenType> FittedState<T> {
    fn build(
        vocab: Arc<SymbolVocab<T>>,
        options: &BytePairTrainerOptions,
        report: Option<TrainingReport>,
    ) -> Self {
        let encoder = TrieEncoder::init(vocab.clone(), options.segmentor());
        let decoder = SymbolDecoder::new(vocab.clone(), options.boundary_marker);
        Self {
            vocab,
            encoder,
            decoder,
            report,
        }
    }
}

/// Learns a subword vocabulary with [`fit`](Self::fit), then maps text to and from token ids.
///
/// The fitted vocabulary and trie are immutable and shared; encoding and decoding
/// take `&self`, and may run concurrently.
///
/// ## Parameters
/// * `T` - the token id type.
#[derive(Debug, Clone)]
pub struct BytePairEncoder<T: TokenType = u32> {
    options: BytePairTrainerOptions,
    fitted: Option<FittedState<T>>,
}

impl<T: TokenType> BytePairEncoder<T> {
    /// Create a new, unfitted encoder.
    pub fn new(options: BytePairTrainerOptions) -> Self {
        Self {
            options,
            fitted: None,
        }
    }

    /// Create a fitted encoder from an existing vocabulary.
    ///
    /// ## Arguments
    /// * `vocab` - the vocabulary, typically loaded from disk.
    /// * `options` - options supplying the boundary marker used when `vocab` was trained.
    pub fn from_vocab(
        vocab: Arc<SymbolVocab<T>>,
        options: BytePairTrainerOptions,
    ) -> Self {
        let fitted = FittedState::build(vocab, &options, None);
        Self {
            options,
            fitted: Some(fitted),
        }
    }

    /// The encoder options.
    pub fn options(&self) -> &BytePairTrainerOptions {
        &self.options
    }

    /// Returns true after a successful fit.
    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    fn fitted(&self) -> BPTResult<&FittedState<T>> {
        self.fitted.as_ref().ok_or(BPTError::NotFitted)
    }

    /// Learn a vocabulary from `corpus`.
    ///
    /// On success the new vocabulary and trie replace any previous ones.
    /// On failure the encoder is left exactly as it was.
    ///
    /// ## Arguments
    /// * `corpus` - the training texts.
    ///
    /// ## Returns
    /// [`BPTError::EmptyCorpus`] if the corpus contains no words;
    /// [`BPTError::MarkerInText`] if a sample contains the boundary marker.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, corpus)))]
    pub fn fit<I>(
        &mut self,
        corpus: I,
    ) -> BPTResult<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let segmentor = self.options.segmentor();
        let mut trainer = self.options.clone().init::<u64>();
        for sample in corpus {
            let sample = sample.as_ref();
            segmentor.check_text(sample)?;
            trainer.update_from_text(sample);
        }
        if trainer.word_counter.is_empty() {
            return Err(BPTError::EmptyCorpus);
        }

        let TrainResults { vocab, report } = trainer.train::<T>()?;
        log::info!(
            "fitted vocabulary: {} entries from {} merges",
            vocab.len(),
            report.merges.len()
        );

        self.fitted = Some(FittedState::build(
            Arc::new(vocab),
            &self.options,
            Some(report),
        ));
        Ok(())
    }

    /// Encode text into token ids.
    pub fn transform(
        &self,
        text: &str,
    ) -> BPTResult<Vec<T>> {
        self.fitted()?.encoder.try_encode(text)
    }

    /// Decode token ids into text.
    ///
    /// Ids outside the vocabulary decode to the unknown symbol.
    pub fn inverse_transform(
        &self,
        tokens: &[T],
    ) -> BPTResult<String> {
        self.fitted()?.decoder.try_decode_to_string(tokens)
    }

    /// The number of vocabulary entries, including the unknown token.
    pub fn vocab_size(&self) -> BPTResult<usize> {
        Ok(self.fitted()?.vocab.len())
    }

    /// The fitted vocabulary.
    pub fn vocab(&self) -> BPTResult<&Arc<SymbolVocab<T>>> {
        Ok(&self.fitted()?.vocab)
    }

    /// The fitted encoder.
    pub fn encoder(&self) -> BPTResult<&TrieEncoder<T>> {
        Ok(&self.fitted()?.encoder)
    }

    /// The fitted decoder.
    pub fn decoder(&self) -> BPTResult<&SymbolDecoder<T>> {
        Ok(&self.fitted()?.decoder)
    }

    /// The report of the last fit; `None` for encoders built with [`from_vocab`](Self::from_vocab).
    pub fn training_report(&self) -> BPTResult<Option<&TrainingReport>> {
        Ok(self.fitted()?.report.as_ref())
    }

    /// Save the fitted vocabulary as a base64 vocab file.
    pub fn save_vocab_path<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> BPTResult<()> {
        save_base64_vocab_path(&self.fitted()?.vocab, path)
    }
}
