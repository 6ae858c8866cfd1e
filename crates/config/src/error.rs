//! Configuration Error Types
//!
//! Every configuration error is fatal: the binary reports it and exits before
//! any job runs.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A configuration file given explicitly doesn't exist
    #[display("configuration file not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// The merged sources don't deserialize into a configuration
    #[display("could not load configuration")]
    Load,
    /// A value deserialized fine but makes no sense
    #[display("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        field: &'static str,
        reason: String,
    },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
