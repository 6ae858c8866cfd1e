//! Scripted transport for testing.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use url::Url;

use crate::error::{ErrorKind, Result};
use crate::transport::{Response, Transport};

enum Scripted {
    Reply(Response),
    Fail,
}

/// Transport answering from a script instead of the network.
///
/// Every URL has its own queue of replies, consumed in order. A URL with no
/// reply left answers `404`. Every request is recorded, see
/// [`requests`](Self::requests).
#[derive(Default)]
pub struct MockTransport {
    script: RefCell<HashMap<String, VecDeque<Scripted>>>,
    requests: RefCell<Vec<Url>>,
}
impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a reply served from `url` itself.
    ///
    /// Panics if `url` doesn't parse. If test setup is wrong, then the test
    /// should not pass.
    pub fn reply(self, url: &str, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.redirect(url, url, status, body)
    }

    /// Queues a reply for `url` that ends up at `final_url`.
    pub fn redirect(self, url: &str, final_url: &str, status: u16, body: impl Into<Vec<u8>>) -> Self {
        let Ok(final_url) = Url::parse(final_url) else {
            panic!("MockTransport: invalid URL {final_url}");
        };
        self.push(url, Scripted::Reply(Response { url: final_url, status, body: body.into() }))
    }

    /// Queues a network failure for `url`.
    pub fn fail(self, url: &str) -> Self {
        self.push(url, Scripted::Fail)
    }

    fn push(self, url: &str, scripted: Scripted) -> Self {
        let Ok(key) = Url::parse(url) else {
            panic!("MockTransport: invalid URL {url}");
        };
        self.script.borrow_mut().entry(key.into()).or_default().push_back(scripted);
        self
    }

    /// Every URL requested so far, in order.
    pub fn requests(&self) -> Vec<Url> {
        self.requests.borrow().clone()
    }
}
impl Transport for MockTransport {
    fn get(&self, url: &Url) -> Result<Response> {
        self.requests.borrow_mut().push(url.clone());
        let next = self.script.borrow_mut().get_mut(url.as_str()).and_then(VecDeque::pop_front);
        match next {
            Some(Scripted::Reply(response)) => Ok(response),
            Some(Scripted::Fail) => exn::bail!(ErrorKind::Network(url.to_string())),
            None => Ok(Response { url: url.clone(), status: 404, body: b"not found".to_vec() }),
        }
    }
}
