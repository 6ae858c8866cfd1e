//! Record Error Types
//!
//! Merges themselves never fail: unknown names and missing map files are
//! logged and skipped. Only a missing input directory is worth stopping for.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A record merge error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for record operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A directory the merge reads from doesn't exist
    #[display("directory not found: {}", _0.display())]
    MissingDirectory(#[error(not(source))] PathBuf),
    /// Underlying I/O error
    #[display("I/O error reading {}", _0.display())]
    Io(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
