//! Recoverable decode warnings.
//!
//! Warnings never interrupt control flow: they are appended to the decode's
//! diagnostics list and forwarded to an optional [`DiagnosticSink`].

use std::fmt;

/// Category of a recoverable problem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Child element with no builder; its subtree was skipped.
    UnknownElement,
    /// Recognized element whose content is not decoded.
    Unsupported,
    /// Id registered twice; the first registration wins.
    DuplicateId,
    /// Second library element of the same kind; merged into the first.
    DuplicateLibrary,
    /// Reference with no matching id after the full document was built.
    UnresolvedReference,
    /// Declared `count` differs from the number of values present.
    CountMismatch,
}

impl DiagnosticKind {
    /// Short lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownElement => "unknown element",
            Self::Unsupported => "unsupported",
            Self::DuplicateId => "duplicate id",
            Self::DuplicateLibrary => "duplicate library",
            Self::UnresolvedReference => "unresolved reference",
            Self::CountMismatch => "count mismatch",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single warning record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Warning category.
    pub kind: DiagnosticKind,
    /// Element kind the warning was raised in (the parent for unknown children).
    pub element: String,
    /// Offending child tag, attribute or id.
    pub tag: String,
    /// Human readable detail.
    pub message: String,
}

impl Diagnostic {
    /// Create a diagnostic record.
    pub fn new(
        kind: DiagnosticKind,
        element: impl Into<String>,
        tag: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            element: element.into(),
            tag: tag.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}> '{}': {}", self.kind, self.element, self.tag, self.message)
    }
}

/// Receiver of warnings as they are recorded.
pub trait DiagnosticSink {
    /// Called once per warning, in document order.
    fn report(&mut self, diagnostic: &Diagnostic);
}

/// Sink that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn report(&mut self, _diagnostic: &Diagnostic) {}
}

/// Sink that emits every warning as a `tracing` event.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, d: &Diagnostic) {
        tracing::warn!(kind = %d.kind, element = %d.element, tag = %d.tag, "{}", d.message);
    }
}

impl<F: FnMut(&Diagnostic)> DiagnosticSink for F {
    fn report(&mut self, diagnostic: &Diagnostic) {
        self(diagnostic)
    }
}

/// Accumulated warnings of one decode, forwarded to an optional sink.
pub struct Diagnostics<'s> {
    records: Vec<Diagnostic>,
    sink: Option<Box<dyn DiagnosticSink + 's>>,
}

impl<'s> Diagnostics<'s> {
    /// Create an empty list without a sink.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            sink: None,
        }
    }

    /// Create an empty list forwarding to `sink`.
    pub fn with_sink(sink: impl DiagnosticSink + 's) -> Self {
        Self {
            records: Vec::new(),
            sink: Some(Box::new(sink)),
        }
    }

    /// Record a warning.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        if let Some(sink) = self.sink.as_mut() {
            sink.report(&diagnostic);
        }
        self.records.push(diagnostic);
    }

    /// Shorthand for `push(Diagnostic::new(..))`.
    pub fn warn(
        &mut self,
        kind: DiagnosticKind,
        element: impl Into<String>,
        tag: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.push(Diagnostic::new(kind, element, tag, message));
    }

    /// Number of warnings recorded so far.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Recorded warnings.
    pub fn records(&self) -> &[Diagnostic] {
        &self.records
    }

    /// Take the recorded warnings, dropping the sink.
    pub fn into_records(self) -> Vec<Diagnostic> {
        self.records
    }
}

impl Default for Diagnostics<'_> {
    fn default() -> Self {
        Self::new()
    }
}
