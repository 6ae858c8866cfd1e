use std::time::Duration;

use exn::ResultExt;
use reqwest::blocking::Client;
use tracing::{instrument, trace};
use url::Url;

use crate::error::{ErrorKind, Result};

/// Identifies the tool to the sites it scrapes.
pub const DEFAULT_USER_AGENT: &str = concat!("dinoscrape/", env!("CARGO_PKG_VERSION"), " (creature data batch job)");
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// A raw HTTP response, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Final URL, after redirects.
    pub url: Url,
    pub status: u16,
    pub body: Vec<u8>,
}

/// Performs a single GET request. Retrying and rate limiting are the
/// [`Fetcher`](crate::Fetcher)'s job, not the transport's.
pub trait Transport {
    fn get(&self, url: &Url) -> Result<Response>;
}

/// Blocking `reqwest` transport following redirects.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}
impl HttpTransport {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .or_raise(|| ErrorKind::Client)?;
        Ok(Self { client })
    }
}
impl Transport for HttpTransport {
    #[instrument(level = "debug", skip(self, url), fields(url = %url))]
    fn get(&self, url: &Url) -> Result<Response> {
        let response = self.client.get(url.clone()).send().or_raise(|| ErrorKind::Network(url.to_string()))?;
        let final_url = response.url().clone();
        let status = response.status().as_u16();
        let body = response.bytes().or_raise(|| ErrorKind::Body)?.to_vec();
        trace!(status, final_url = %final_url, body_size = body.len(), "response received");
        Ok(Response { url: final_url, status, body })
    }
}
