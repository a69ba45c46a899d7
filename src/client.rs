use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

use crate::config::{
    DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_INTERVAL_MILLIS, HTTP_TIMEOUT_SECS, RESAS_API_BASE_URL,
    USER_AGENT,
};
use crate::error::{Error, Result};
use crate::validate::error_for_status_code;

/// Source of decoded RESAS payloads, one per category path.
pub trait Fetch {
    /// GET `category_path` (e.g. `cities?prefCode=13`) and decode the body.
    ///
    /// The body is returned as-is; classifying it is up to the caller.
    fn fetch(&self, category_path: &str) -> Result<Value>;
}

/// How often a retryable failure is retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the first one included.
    pub attempts: u32,
    /// Delay before the first retry. Doubled for every further retry.
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_RETRY_ATTEMPTS,
            interval: Duration::from_millis(DEFAULT_RETRY_INTERVAL_MILLIS),
        }
    }
}

impl RetryPolicy {
    /// A single attempt: the first failure is final.
    pub fn none() -> Self {
        Self {
            attempts: 1,
            interval: Duration::ZERO,
        }
    }

    /// Delay after the `failed`-th failed attempt (1-based).
    pub fn backoff(&self, failed: u32) -> Duration {
        self.interval
            .saturating_mul(1u32 << failed.saturating_sub(1).min(16))
    }
}

/// Blocking RESAS-API client.
pub struct Client {
    client: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
}

impl Client {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, RESAS_API_BASE_URL)
    }

    /// Client for a RESAS-compatible host. Category paths are appended to `base_url`.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Ok(Client {
            client,
            api_key: api_key.into(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn send_request(&self, url: &str) -> Result<Value> {
        tracing::debug!(url, "Sending request");
        let response = self
            .client
            .get(url)
            .header(CONTENT_TYPE, "application/json")
            .header("X-API-KEY", &self.api_key)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, url, "RESAS-API responded with a non-success status");
        }

        let response_text = response.text()?;
        if response_text.trim().is_empty() {
            if !status.is_success() {
                return Err(error_for_status_code(
                    status.as_str(),
                    status.canonical_reason().map(String::from),
                ));
            }
            return Ok(Value::Null);
        }
        match serde_json::from_str(&response_text) {
            Ok(payload) => Ok(payload),
            // Error pages are not JSON. Classify them by the HTTP status instead.
            Err(_) if !status.is_success() => Err(error_for_status_code(
                status.as_str(),
                status.canonical_reason().map(String::from),
            )),
            Err(err) => Err(Error::from(err)),
        }
    }
}

impl Fetch for Client {
    fn fetch(&self, category_path: &str) -> Result<Value> {
        let url = format!("{}{}", self.base_url, category_path);
        self.send_request(&url)
    }
}
