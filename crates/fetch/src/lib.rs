pub mod error;
mod fetcher;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod transport;

pub use crate::fetcher::{DEFAULT_RATE_LIMIT_MARKERS, Fetcher, Page, RetryPolicy};
#[cfg(any(test, feature = "mock"))]
pub use crate::mock::MockTransport;
pub use crate::transport::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, HttpTransport, Response, Transport};
