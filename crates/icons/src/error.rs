//! Icon Error Types

use derive_more::{Display, Error};
use std::path::PathBuf;

/// An icon error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for icon operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input directory doesn't exist
    #[display("directory not found: {}", _0.display())]
    MissingDirectory(#[error(not(source))] PathBuf),
    /// Reading or writing a file failed
    #[display("I/O error on {}", _0.display())]
    Io(#[error(not(source))] PathBuf),
    /// File isn't a PNG image we can decode
    #[display("cannot decode image {}", _0.display())]
    Decode(#[error(not(source))] PathBuf),
    /// Encoding the recolored image failed
    #[display("cannot encode image {}", _0.display())]
    Encode(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
