//! # Text Segmentation
//!
//! Splits raw text into whitespace-delimited words, and marks the end of
//! each word with a boundary marker symbol.
//!
//! The boundary marker keeps merges from crossing word boundaries during
//! training, and lets decoding reconstruct the spacing between words.

mod text_segmentor;

#[doc(inline)]
pub use text_segmentor::*;
