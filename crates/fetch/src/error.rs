//! Fetch Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction. The fetcher never decides whether a failure is fatal;
//! callers skip or abort based on [`ErrorKind::is_retryable`] and their own
//! policy.

use derive_more::{Display, Error};

/// A fetch error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for fetch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The HTTP client could not be built (TLS backend, bad user agent).
    #[display("HTTP client setup failed")]
    Client,
    /// Timeout, DNS failure, refused connection...
    #[display("network error while fetching {_0}")]
    Network(#[error(not(source))] String),
    /// Non-success status that isn't rate limiting.
    #[display("unexpected HTTP status {_0}")]
    Status(#[error(not(source))] u16),
    /// Still rate limited when the retry policy ran out.
    #[display("rate limited, gave up after {attempts} attempts")]
    RateLimited {
        /// Requests made, including the first one.
        attempts: u32,
    },
    /// The response body could not be read to the end.
    #[display("unreadable response body")]
    Body,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::RateLimited { .. } | Self::Body => true,
            Self::Status(status) => *status >= 500,
            Self::Client => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorKind::Network("https://wikily.gg/".to_string()), true)]
    #[case(ErrorKind::RateLimited { attempts: 3 }, true)]
    #[case(ErrorKind::Status(503), true)]
    #[case(ErrorKind::Status(404), false)]
    #[case(ErrorKind::Client, false)]
    fn test_is_retryable(#[case] kind: ErrorKind, #[case] expected: bool) {
        assert_eq!(kind.is_retryable(), expected);
    }

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::Status(404).to_string(), "unexpected HTTP status 404");
        assert_eq!(
            ErrorKind::RateLimited { attempts: 2 }.to_string(),
            "rate limited, gave up after 2 attempts"
        );
    }
}
