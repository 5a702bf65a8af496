//! # Token Decoder Trait

use crate::{BPTResult, TokenType};

/// Trait for token decoders.
pub trait TokenDecoder<T: TokenType>: Send + Sync {
    /// Decode tokens into text, appending to the target buffer.
    ///
    /// ## Arguments
    /// * `tokens` - The tokens to decode.
    /// * `text` - The target string buffer to append to.
    fn try_decode_append(
        &self,
        tokens: &[T],
        text: &mut String,
    ) -> BPTResult<()>;

    /// Decode tokens into a string.
    fn try_decode_to_string(
        &self,
        tokens: &[T],
    ) -> BPTResult<String> {
        let mut text = String::with_capacity(tokens.len() * 4);
        self.try_decode_append(tokens, &mut text)?;
        Ok(text)
    }

    /// Decode a batch of token vectors into strings.
    ///
    /// Runs in parallel under the `rayon` feature.
    fn try_decode_batch_to_strings(
        &self,
        batch: &[Vec<T>],
    ) -> BPTResult<Vec<String>> {
        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;
            batch
                .par_iter()
                .map(|tokens| self.try_decode_to_string(tokens))
                .collect()
        }
        #[cfg(not(feature = "rayon"))]
        {
            batch
                .iter()
                .map(|tokens| self.try_decode_to_string(tokens))
                .collect()
        }
    }
}
