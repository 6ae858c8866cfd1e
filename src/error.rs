//! Job Error Types
//!
//! Only what stops a whole job ends up here: bad configuration, a missing
//! input, an output directory that can't be written. Everything that concerns
//! a single page, row, record or file is logged where it happens and skipped.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A job error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for jobs.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Configuration could not be loaded or is invalid
    #[display("invalid configuration")]
    Config,
    /// A required input file or directory doesn't exist
    #[display("input not found: {}", _0.display())]
    MissingInput(#[error(not(source))] PathBuf),
    /// An input exists but can't be read or parsed
    #[display("unreadable input: {}", _0.display())]
    Input(#[error(not(source))] PathBuf),
    /// Results could not be written
    #[display("could not write output: {}", _0.display())]
    Output(#[error(not(source))] PathBuf),
    /// The HTTP client could not be set up
    #[display("HTTP client setup failed")]
    Http,
    /// A page the whole job depends on could not be fetched
    #[display("could not fetch {_0}")]
    Fetch(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }
}
