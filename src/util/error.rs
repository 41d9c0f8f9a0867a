//! Error types for the COLLADA decoder.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::core::Diagnostic;

/// Fatal decode error.
///
/// Anything that can be recovered from (unknown elements, duplicate ids,
/// dangling references) is reported as a [`Diagnostic`] instead.
#[derive(Error, Debug)]
pub enum Error {
    /// File does not exist or cannot be accessed
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Markup is not well formed
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Stream ended while an element was still open
    #[error("Unexpected end of input: <{open}> is never closed")]
    UnexpectedEndOfInput { open: String },

    /// End tag does not close the innermost open element
    #[error("Mismatched end tag: expected </{expected}>, got </{found}>")]
    MismatchedEndTag { expected: String, found: String },

    /// Attribute (or mandatory text payload) required by the format is absent
    #[error("<{element}> is missing required attribute '{attribute}'")]
    MissingRequiredAttribute { element: String, attribute: String },

    /// Element nesting exceeds the configured maximum
    #[error("Element nesting exceeds depth limit of {limit}")]
    DepthLimitExceeded { limit: usize },

    /// Attribute or text could not be converted to the expected type
    #[error("Invalid value in <{element}>: '{value}'")]
    InvalidValue { element: String, value: String },

    /// Document element is not the expected root
    #[error("Unexpected root element <{0}>, expected <COLLADA>")]
    UnexpectedRoot(String),

    /// Reference left dangling while decoding in strict mode
    #[error("Unresolved reference '{url}' in <{element}>")]
    UnresolvedReference { url: String, element: String },

    /// Caller aborted the decode
    #[error("Decode cancelled")]
    Cancelled,

    /// Memory mapping failed
    #[error("Memory mapping failed: {0}")]
    MmapFailed(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON input could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create a malformed input error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedInput(msg.into())
    }

    /// Create a missing attribute error.
    pub fn missing(element: &str, attribute: &str) -> Self {
        Self::MissingRequiredAttribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
        }
    }

    /// Create an invalid value error.
    pub fn invalid(element: &str, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            element: element.to_string(),
            value: value.into(),
        }
    }

    /// True for errors caused by the structure of the input rather than I/O.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::MalformedInput(_)
                | Self::UnexpectedEndOfInput { .. }
                | Self::MismatchedEndTag { .. }
                | Self::MissingRequiredAttribute { .. }
                | Self::DepthLimitExceeded { .. }
                | Self::InvalidValue { .. }
                | Self::UnexpectedRoot(_)
        )
    }
}

impl From<quick_xml::Error> for Error {
    fn from(e: quick_xml::Error) -> Self {
        match e {
            quick_xml::Error::Io(io) => Self::Io(std::io::Error::new(io.kind(), io.to_string())),
            other => Self::MalformedInput(other.to_string()),
        }
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(e: std::str::Utf8Error) -> Self {
        Self::MalformedInput(e.to_string())
    }
}

/// Result type alias for decoder operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A failed decode: the fatal error, where it happened, and every warning
/// collected before it.
#[derive(Debug)]
pub struct DecodeError {
    /// The fatal error.
    pub error: Error,
    /// Slash-separated path of open elements when the error was raised.
    pub path: String,
    /// Warnings recorded up to the failure.
    pub diagnostics: Vec<Diagnostic>,
}

impl DecodeError {
    /// Wrap an error that happened outside of any element.
    pub fn new(error: Error) -> Self {
        Self {
            error,
            path: String::new(),
            diagnostics: Vec::new(),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.error)
        } else {
            write!(f, "{} (at {})", self.error, self.path)
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl From<Error> for DecodeError {
    fn from(error: Error) -> Self {
        Self::new(error)
    }
}
