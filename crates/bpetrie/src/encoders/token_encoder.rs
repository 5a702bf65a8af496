//! # Token Encoder Trait

use crate::{BPTResult, TokenType, segmentation::TextSegmentor};

/// A trait for token encoders.
pub trait TokenEncoder<T: TokenType>: Send + Sync {
    /// Return the attached text segmentor.
    fn segmentor(&self) -> &TextSegmentor;

    /// Encode text into tokens, appending to the target buffer.
    ///
    /// ## Arguments
    /// * `text` - The string slice to encode.
    /// * `tokens` - The target token buffer to append to.
    fn try_encode_append(
        &self,
        text: &str,
        tokens: &mut Vec<T>,
    ) -> BPTResult<()>;

    /// Encode text into tokens.
    ///
    /// ## Arguments
    /// * `text` - The string slice to encode.
    ///
    /// ## Returns
    /// A vector of tokens.
    fn try_encode(
        &self,
        text: &str,
    ) -> BPTResult<Vec<T>> {
        let mut tokens = Vec::with_capacity(text.len() / 2);
        self.try_encode_append(text, &mut tokens)?;
        Ok(tokens)
    }

    /// Encode a batch of text into tokens.
    ///
    /// Runs in parallel under the `rayon` feature.
    ///
    /// ## Arguments
    /// * `batch` - A batch of text strings to encode.
    ///
    /// ## Returns
    /// A vector of token vectors, in batch order.
    fn try_encode_batch(
        &self,
        batch: &[&str],
    ) -> BPTResult<Vec<Vec<T>>> {
        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;
            batch.par_iter().map(|text| self.try_encode(text)).collect()
        }
        #[cfg(not(feature = "rayon"))]
        {
            batch.iter().map(|text| self.try_encode(text)).collect()
        }
    }
}
