//! # COLLADA
//!
//! Decoder for COLLADA (`.dae`) digital asset documents.
//!
//! A document is read in a single forward pass over a token stream. Every
//! element builder consumes its element's immediate children through one
//! shared child iteration primitive; unknown content is skipped with a
//! warning instead of failing the decode. Cross-references between items
//! are collected while building and resolved once the whole tree exists.
//!
//! ## Modules
//!
//! - [`util`] - Errors and text-to-value parsing
//! - [`core`] - Token cursors (XML, JSON), child iteration, id registry, diagnostics, options
//! - [`dom`] - Document tree (libraries, images, effects, materials, animations)
//! - [`decode`] - Per-element builders and the [`Decoder`](decode::Decoder)
//!
//! ## Example
//!
//! ```ignore
//! use collada::Document;
//!
//! let doc = Document::open("scene.dae")?;
//! for material in doc.materials().into_iter().flat_map(|lib| lib.iter()) {
//!     let effect = doc.material_effect(material);
//!     println!("{:?} -> {:?}", material.id, effect.and_then(|e| e.id.as_deref()));
//! }
//! for warning in doc.diagnostics() {
//!     eprintln!("{warning}");
//! }
//! ```

pub mod util;
pub mod core;
pub mod dom;
pub mod decode;

// Re-export commonly used types
pub use util::{DecodeError, Error, Result};
pub use dom::Document;
pub use decode::{decode, decode_json, decode_reader, Decoder};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{DecodeError, Error, Result};
    pub use crate::core::{CancelToken, DecodeOptions, Diagnostic, DiagnosticKind, DiagnosticSink, TracingSink};
    pub use crate::decode::{decode, decode_json, decode_json_value, decode_reader, decode_with, Decoder};
    pub use crate::dom::*;
}
