use std::borrow::Cow;
use std::cell::Cell;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::{ErrorKind, Result};
use crate::transport::{Response, Transport};

const TOO_MANY_REQUESTS: u16 = 429;
/// Successful bodies longer than this are real pages, never throttle notices,
/// even when they mention a marker.
const MAX_NOTICE_LEN: usize = 4 * 1024;

/// Body text that sites serve instead of a `429` when throttling.
pub const DEFAULT_RATE_LIMIT_MARKERS: [&str; 2] = ["Too Many Requests", "rate limited"];

/// What to do when a site rate limits us.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total requests per URL, `None` to retry until the site gives in.
    pub max_attempts: Option<u32>,
    /// Fixed delay before each retry.
    pub backoff: Duration,
}
impl RetryPolicy {
    pub fn bounded(max_attempts: u32, backoff: Duration) -> Self {
        Self { max_attempts: Some(max_attempts.max(1)), backoff }
    }

    pub fn unlimited(backoff: Duration) -> Self {
        Self { max_attempts: None, backoff }
    }

    fn exhausted(&self, attempts: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max)
    }
}
impl Default for RetryPolicy {
    fn default() -> Self {
        Self::unlimited(Duration::from_secs(5))
    }
}

/// A successfully fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Final URL, after redirects; site detection must use this one.
    pub url: Url,
    pub status: u16,
    pub body: Vec<u8>,
}
impl Page {
    /// Body as text, invalid UTF-8 replaced with U+FFFD.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}
impl From<Response> for Page {
    fn from(response: Response) -> Self {
        Self { url: response.url, status: response.status, body: response.body }
    }
}

/// Fetches pages one at a time, backing off while rate limited and keeping a
/// minimum interval between consecutive requests.
pub struct Fetcher<T> {
    transport: T,
    policy: RetryPolicy,
    /// Lowercase.
    markers: Vec<String>,
    min_interval: Duration,
    last_request: Cell<Option<Instant>>,
}
impl<T: Transport> Fetcher<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            policy: RetryPolicy::default(),
            markers: DEFAULT_RATE_LIMIT_MARKERS.iter().map(|marker| marker.to_lowercase()).collect(),
            min_interval: Duration::ZERO,
            last_request: Cell::new(None),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replaces the body markers that signal rate limiting (matched
    /// case-insensitively).
    pub fn with_rate_limit_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.markers = markers
            .into_iter()
            .map(|marker| marker.as_ref().trim().to_lowercase())
            .filter(|marker| !marker.is_empty())
            .collect();
        self
    }

    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetches `url`, retrying for as long as the site rate limits us and the
    /// policy allows.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::Network`] when the request itself fails (not retried),
    /// - [`ErrorKind::Status`] for a non-success status other than `429`,
    /// - [`ErrorKind::RateLimited`] once a bounded policy is used up.
    #[instrument(skip(self, url), fields(url = %url))]
    pub fn fetch(&self, url: &Url) -> Result<Page> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            self.throttle();
            let response = self.transport.get(url)?;
            if !self.is_rate_limited(&response) {
                if !(200..300).contains(&response.status) {
                    exn::bail!(ErrorKind::Status(response.status));
                }
                debug!(status = response.status, final_url = %response.url, "fetched");
                return Ok(response.into());
            }
            if self.policy.exhausted(attempts) {
                exn::bail!(ErrorKind::RateLimited { attempts });
            }
            warn!(attempts, backoff = ?self.policy.backoff, "rate limited, backing off");
            thread::sleep(self.policy.backoff);
        }
    }

    fn is_rate_limited(&self, response: &Response) -> bool {
        if response.status == TOO_MANY_REQUESTS {
            return true;
        }
        let successful = (200..300).contains(&response.status);
        if self.markers.is_empty() || (successful && response.body.len() > MAX_NOTICE_LEN) {
            return false;
        }
        let body = String::from_utf8_lossy(&response.body).to_lowercase();
        self.markers.iter().any(|marker| body.contains(marker.as_str()))
    }

    fn throttle(&self) {
        if let Some(last) = self.last_request.get() {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                thread::sleep(self.min_interval - elapsed);
            }
        }
        self.last_request.set(Some(Instant::now()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockTransport;

    const URL: &str = "https://ark.wiki.gg/wiki/Rex";

    fn url() -> Url {
        Url::parse(URL).unwrap()
    }

    fn fetcher(transport: MockTransport) -> Fetcher<MockTransport> {
        Fetcher::new(transport).with_policy(RetryPolicy::bounded(3, Duration::ZERO))
    }

    #[test]
    fn returns_page_with_final_url() {
        let transport = MockTransport::new().redirect(URL, "https://ark.wiki.gg/wiki/Rex_(ASA)", 200, "ok");
        let page = fetcher(transport).fetch(&url()).unwrap();
        assert_eq!(page.url.as_str(), "https://ark.wiki.gg/wiki/Rex_(ASA)");
        assert_eq!(page.status, 200);
        assert_eq!(page.text(), "ok");
    }

    #[test]
    fn retries_while_rate_limited() {
        let transport = MockTransport::new()
            .reply(URL, 429, "")
            .reply(URL, 200, "<p>Too many requests, slow down</p>")
            .reply(URL, 200, "<html>Rex</html>");
        let fetcher = fetcher(transport);
        assert_eq!(fetcher.fetch(&url()).unwrap().text(), "<html>Rex</html>");
        assert_eq!(fetcher.transport().requests().len(), 3);
    }

    #[test]
    fn gives_up_when_policy_is_exhausted() {
        let transport = MockTransport::new().reply(URL, 429, "").reply(URL, 429, "").reply(URL, 429, "");
        let error = fetcher(transport).fetch(&url()).unwrap_err();
        assert_eq!(*error, ErrorKind::RateLimited { attempts: 3 });
    }

    #[test]
    fn other_statuses_are_errors_without_retry() {
        let fetcher = fetcher(MockTransport::new().reply(URL, 500, "oops"));
        assert_eq!(*fetcher.fetch(&url()).unwrap_err(), ErrorKind::Status(500));
        assert_eq!(fetcher.transport().requests().len(), 1);
        // Unscripted URLs answer 404.
        assert_eq!(*fetcher.fetch(&url()).unwrap_err(), ErrorKind::Status(404));
    }

    #[test]
    fn network_errors_are_not_retried() {
        let fetcher = fetcher(MockTransport::new().fail(URL).reply(URL, 200, "late"));
        assert!(matches!(*fetcher.fetch(&url()).unwrap_err(), ErrorKind::Network(_)));
        assert_eq!(fetcher.transport().requests().len(), 1);
    }

    #[test]
    fn custom_markers_replace_defaults() {
        let transport = MockTransport::new().reply(URL, 200, "Slow Down please").reply(URL, 200, "rate limited");
        let fetcher = fetcher(transport).with_rate_limit_markers(["slow down"]);
        assert_eq!(fetcher.fetch(&url()).unwrap().text(), "rate limited");
    }

    #[test]
    fn long_pages_mentioning_a_marker_are_not_throttle_notices() {
        let article = format!("<html>{}<p>Players get rate limited in PvP.</p></html>", "<p>Rex</p>".repeat(1000));
        let fetcher = fetcher(MockTransport::new().reply(URL, 200, article.clone()));
        assert_eq!(fetcher.fetch(&url()).unwrap().text(), article);
        assert_eq!(fetcher.transport().requests().len(), 1);
    }

    #[test]
    fn error_pages_mentioning_a_marker_are_retried() {
        let notice = format!("<html>{}Too Many Requests</html>", " ".repeat(MAX_NOTICE_LEN));
        let transport = MockTransport::new().reply(URL, 503, notice).reply(URL, 200, "ok");
        let fetcher = fetcher(transport);
        assert_eq!(fetcher.fetch(&url()).unwrap().text(), "ok");
        assert_eq!(fetcher.transport().requests().len(), 2);
    }

    #[test]
    fn keeps_minimum_interval_between_requests() {
        let transport = MockTransport::new().reply(URL, 200, "a").reply(URL, 200, "b");
        let fetcher = fetcher(transport).with_min_interval(Duration::from_millis(30));
        let started = Instant::now();
        fetcher.fetch(&url()).unwrap();
        fetcher.fetch(&url()).unwrap();
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn bounded_policy_allows_at_least_one_attempt() {
        assert_eq!(RetryPolicy::bounded(0, Duration::ZERO).max_attempts, Some(1));
        assert_eq!(RetryPolicy::default().max_attempts, None);
    }
}
