//! Utility types and functions for the decoder.
//!
//! - [`Error`] / [`Result`] / [`DecodeError`] - Error handling
//! - Text-to-value parsing and math type re-exports from glam

mod error;
mod values;

pub use error::*;
pub use values::*;
