//! # Error Types

/// Errors produced by fitting, encoding, decoding and vocabulary IO.
#[derive(Debug, thiserror::Error)]
pub enum BPTError {
    /// `transform` / `inverse_transform` called before a successful `fit`.
    #[error("encoder is not fitted")]
    NotFitted,

    /// `fit` was called on input containing no words.
    #[error("training corpus contains no words")]
    EmptyCorpus,

    /// Input text contains the word boundary marker.
    #[error("text contains the boundary marker {marker:?}")]
    MarkerInText {
        /// The configured boundary marker.
        marker: char,
    },

    /// The merge loop was started on an empty word table.
    #[error("cannot train a vocabulary from an empty word table")]
    EmptyVocabulary,

    /// A vocabulary failed validation or parsing.
    #[error("invalid vocabulary: {0}")]
    InvalidVocab(String),

    /// Underlying IO failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A persisted symbol was not valid base64.
    #[error(transparent)]
    Base64(#[from] base64::DecodeError),
}

/// Result alias for [`BPTError`].
pub type BPTResult<T> = Result<T, BPTError>;
