//! Extraction Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction. Malformed *values* never end up here: numeric cells and
//! stat table values fall back to named defaults instead. Only structural
//! problems (a page missing the element its profile depends on, an unreadable
//! spreadsheet) are raised.

use derive_more::{Display, Error};

/// An extraction error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// An element the site profile depends on is absent from the page.
    #[display("missing required element: {_0}")]
    MissingElement(#[error(not(source))] &'static str),
    /// A field was found but could not be parsed.
    #[display("failed to parse field '{field}', found value: {value}")]
    ParseError {
        /// The field that failed to parse.
        field: &'static str,
        /// The offending value.
        value: String,
    },
    /// The delimited text input could not be read.
    #[display("unreadable spreadsheet")]
    Spreadsheet,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // A document either has the structure or it doesn't; fetching the
        // same bytes again won't change that.
        false
    }
}
