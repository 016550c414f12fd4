// src/github/client.rs
// =============================================================================
// The HTTP seam between the pipeline and the network.
//
// Everything that talks to GitHub goes through the `HttpClient` trait, so
// the pipeline can run against:
// - ReqwestHttpClient: the real thing
// - MockHttpClient:    scripted replies per URL path, for tests and demos
//
// A request either yields the body text of a 2xx response, or fails with
// `Error::HttpStatus` (the host answered with anything else) or
// `Error::Transport` (no usable answer at all). Callers treat the two
// differently: a 404 on `main` is worth a retry on `master`, a dead network
// is not.
// =============================================================================

use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

#[async_trait]
pub trait HttpClient: Send + Sync {
    /// GETs `url` and returns the body of a successful response.
    async fn get_text(&self, url: &Url) -> Result<String>;
}

/// `reqwest`-backed client used in production.
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// Builds a client. `timeout` bounds each request; `None` waits forever.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        // GitHub rejects API requests without a User-Agent
        let mut builder = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(5));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| Error::config(format!("could not build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get_text(&self, url: &Url) -> Result<String> {
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .send()
            .await
            .map_err(|e| Error::transport(url.as_str(), describe(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::http_status(url.as_str(), status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| Error::transport(url.as_str(), describe(&e)))
    }
}

// Gives reqwest errors a short, stable description
fn describe(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else if error.is_redirect() {
        "too many redirects".to_string()
    } else {
        error.to_string()
    }
}

/// Appends a volatile `timestamp` query parameter so no intermediate cache
/// can serve a stale copy.
pub fn cache_busted(mut url: Url) -> Url {
    url.query_pairs_mut().append_pair("timestamp", &cache_buster());
    url
}

// Milliseconds since the epoch plus a per-process sequence number in base 36,
// so two requests in the same millisecond still differ.
fn cache_buster() -> String {
    static SEQUENCE: AtomicU64 = AtomicU64::new(0);
    let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{}{}", Utc::now().timestamp_millis(), to_base36(sequence))
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut out = Vec::new();
    loop {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
        if n == 0 {
            break;
        }
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// Scripted reply for one URL path.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// 200 with this body.
    Text(String),
    /// Any other status.
    Status(u16),
    /// No response at all.
    Unreachable(String),
}

/// Test double for `HttpClient`.
///
/// Replies are looked up by URL path (query strings such as the
/// cache-buster are ignored). Unknown paths get the default reply: 404,
/// or a transport failure for `offline()` clients.
pub struct MockHttpClient {
    replies: HashMap<String, MockReply>,
    default_reply: MockReply,
    requests: Mutex<Vec<Url>>,
}

impl MockHttpClient {
    /// Every unknown path answers 404.
    pub fn new() -> Self {
        Self {
            replies: HashMap::new(),
            default_reply: MockReply::Status(404),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every unknown path fails as if the network were down.
    pub fn offline() -> Self {
        Self {
            default_reply: MockReply::Unreachable("network unreachable".to_string()),
            ..Self::new()
        }
    }

    pub fn with_text(self, path: &str, body: &str) -> Self {
        self.with_reply(path, MockReply::Text(body.to_string()))
    }

    pub fn with_status(self, path: &str, status: u16) -> Self {
        self.with_reply(path, MockReply::Status(status))
    }

    pub fn with_unreachable(self, path: &str) -> Self {
        self.with_reply(path, MockReply::Unreachable("connection refused".to_string()))
    }

    pub fn with_reply(mut self, path: &str, reply: MockReply) -> Self {
        self.replies.insert(path.to_string(), reply);
        self
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<Url> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// Paths requested so far, in order.
    pub fn requested_paths(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|url| url.path().to_string())
            .collect()
    }
}

impl Default for MockHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get_text(&self, url: &Url) -> Result<String> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.clone());
        }

        match self.replies.get(url.path()).unwrap_or(&self.default_reply) {
            MockReply::Text(body) => Ok(body.clone()),
            MockReply::Status(status) => Err(Error::http_status(url.as_str(), *status)),
            MockReply::Unreachable(message) => Err(Error::transport(url.as_str(), message.clone())),
        }
    }
}
