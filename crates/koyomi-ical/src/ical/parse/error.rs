//! Parse error types.
//!
//! Parse errors are accumulated, never raised mid-document: a malformed
//! input yields a full report instead of stopping at the first problem.

use std::fmt;

use serde::Serialize;

/// An error recorded while parsing a calendar document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParseError {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// Physical line number where the error occurred (1-based).
    pub line: usize,
}

impl ParseError {
    #[must_use]
    pub const fn new(kind: ParseErrorKind, line: usize) -> Self {
        Self { kind, line }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

impl std::error::Error for ParseError {}

/// The kinds of structural errors the parser records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseErrorKind {
    /// The document does not begin with the expected BEGIN tag.
    InvalidComponentStart,
    /// A nested component's accumulated text failed to parse cleanly.
    SubcomponentParseFailure,
    /// A parsed nested component was rejected by its parent.
    SubcomponentAttachFailure,
    /// A property line was rejected by the component it belongs to.
    PropertyAttachFailure,
    /// A line matched neither a component marker nor the property syntax.
    MalformedLine,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidComponentStart => write!(f, "invalid component start tag"),
            Self::SubcomponentParseFailure => write!(f, "failure parsing sub-component"),
            Self::SubcomponentAttachFailure => write!(f, "failure attaching sub-component"),
            Self::PropertyAttachFailure => write!(f, "failure adding property"),
            Self::MalformedLine => write!(f, "unrecognized line syntax"),
        }
    }
}
