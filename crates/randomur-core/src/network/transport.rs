//! HTTP transport used by the gallery client.
//!
//! The core only needs one operation, a GET that yields a fully received
//! [`RawResponse`]. [`ReqwestTransport`] is the production implementation;
//! tests substitute their own.

use crate::config::GalleryConfig;
use crate::network::decoder::RawResponse;
use crate::{RandomurError, Result};
use async_trait::async_trait;
use reqwest::{header, Client};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

/// Narrow request/response interface over an HTTP stack.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Perform exactly one GET request and return the full response.
    async fn get(&self, url: &str, headers: &[(String, String)]) -> Result<RawResponse>;
}

/// Client rate limit reported by the gallery API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateLimitState {
    /// Requests left for this client id today.
    pub client_remaining: Option<u64>,
    /// Daily request allowance for this client id.
    pub client_limit: Option<u64>,
    /// Unix timestamp when the per-user allowance resets.
    pub user_reset: Option<u64>,
}

impl RateLimitState {
    /// Whether the client allowance is used up.
    pub fn is_exhausted(&self) -> bool {
        matches!(self.client_remaining, Some(0))
    }
}

/// [`HttpTransport`] backed by reqwest.
pub struct ReqwestTransport {
    client: Client,
    timeout: Duration,
    // -1 means "not reported yet"
    client_remaining: AtomicI64,
    client_limit: AtomicI64,
    user_reset: AtomicI64,
}

impl ReqwestTransport {
    /// Create a transport using the timeout and user agent from `config`.
    pub fn new(config: &GalleryConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| RandomurError::transport("Failed to create HTTP client", e))?;

        Ok(Self {
            client,
            timeout: config.timeout,
            client_remaining: AtomicI64::new(-1),
            client_limit: AtomicI64::new(-1),
            user_reset: AtomicI64::new(-1),
        })
    }

    /// Get the last rate limit reported by the server.
    pub fn rate_limit_state(&self) -> RateLimitState {
        let load = |value: &AtomicI64| {
            let v = value.load(Ordering::SeqCst);
            (v >= 0).then_some(v as u64)
        };
        RateLimitState {
            client_remaining: load(&self.client_remaining),
            client_limit: load(&self.client_limit),
            user_reset: load(&self.user_reset),
        }
    }

    fn update_rate_limits(&self, headers: &header::HeaderMap) {
        let read = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<i64>().ok())
        };

        if let Some(remaining) = read("X-RateLimit-ClientRemaining") {
            self.client_remaining.store(remaining, Ordering::SeqCst);
        }
        if let Some(limit) = read("X-RateLimit-ClientLimit") {
            self.client_limit.store(limit, Ordering::SeqCst);
        }
        if let Some(reset) = read("X-RateLimit-UserReset") {
            self.user_reset.store(reset, Ordering::SeqCst);
        }

        let state = self.rate_limit_state();
        if state.is_exhausted() {
            warn!("Gallery client rate limit exhausted (limit: {:?})", state.client_limit);
        } else if let (Some(remaining), Some(limit)) = (state.client_remaining, state.client_limit) {
            debug!("Rate limit: {}/{}", remaining, limit);
        }
    }

    fn map_send_error(&self, url: &str, err: reqwest::Error) -> RandomurError {
        if err.is_timeout() {
            RandomurError::Timeout(self.timeout)
        } else {
            RandomurError::transport(format!("GET {} failed", url), err)
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str, headers: &[(String, String)]) -> Result<RawResponse> {
        let mut request = self
            .client
            .get(url)
            .header(header::ACCEPT_ENCODING, "gzip");
        for (key, value) in headers {
            request = request.header(key.as_str(), value.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.map_send_error(url, e))?;

        self.update_rate_limits(response.headers());

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_send_error(url, e))?;

        debug!("GET {} -> {} ({} bytes)", url, status, body.len());
        Ok(RawResponse {
            status,
            headers,
            body: (!body.is_empty()).then_some(body),
        })
    }
}
