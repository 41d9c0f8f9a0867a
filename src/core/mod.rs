//! Core layer - the format-independent decoding machinery.
//!
//! This module provides:
//! - [`TokenSource`] with [`XmlCursor`] and [`JsonCursor`] - forward-only token streams
//! - [`Walker`] - the child iteration protocol every builder is written against
//! - [`Registry`] - id registration and deferred reference resolution
//! - [`Diagnostics`] / [`DiagnosticSink`] - recoverable warnings
//! - [`DecodeOptions`] / [`CancelToken`] - configuration and cooperative cancellation
//! - gzip detection and inflation for compressed input

mod attributes;
mod compression;
mod cursor;
mod diagnostics;
mod json;
mod options;
mod registry;
mod walker;

pub use attributes::Attributes;
pub use compression::{compress, decompress, is_compressed};
pub use cursor::{StartTag, Token, TokenSource, XmlCursor};
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink, Diagnostics, NoopSink, TracingSink};
pub use json::JsonCursor;
pub use options::{CancelToken, DecodeOptions, DEFAULT_MAX_DEPTH};
pub use registry::{fragment, ReferenceSite, Registry};
pub use walker::{Element, Walker};
