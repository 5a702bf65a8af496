//! # Token Decoders
//!
//! [`SymbolDecoder`] maps tokens back to their symbols, and restores word spacing
//! from the boundary markers.

mod symbol_decoder;
mod token_decoder;

#[doc(inline)]
pub use symbol_decoder::*;
#[doc(inline)]
pub use token_decoder::*;
