//! HTTP client with retry on rate-limit and server errors.
//!
//! A response with status 429 or 5xx is retried after a jittered delay of
//! `base_delay + random(0..jitter)`. The window is re-rolled on every attempt
//! and never grows. Everything else (network failures, other 4xx, undecodable
//! bodies, exhausted retries) fails immediately.

use std::time::Duration;

use rand::Rng;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::warn;

/// Default retry ceiling for listing and metadata calls
pub const DEFAULT_API_RETRIES: u32 = 10;

/// Default retry ceiling for binary downloads
pub const DEFAULT_DOWNLOAD_RETRIES: u32 = 5;

/// Errors surfaced by [`RetryingClient`]
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} from {url}")]
    Status { status: StatusCode, url: String },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            FetchError::Request(e) => e.status(),
            FetchError::Decode { .. } => None,
        }
    }
}

/// Whether a status is worth retrying (rate limit or server error)
pub fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Retry ceiling and jitter window for one class of request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,

    /// Fixed part of every wait
    pub base_delay: Duration,

    /// Upper bound of the random part of every wait
    pub jitter: Duration,
}

impl RetryPolicy {
    /// Policy for listing and metadata calls
    pub fn api() -> Self {
        Self::with_retries(DEFAULT_API_RETRIES)
    }

    /// Policy for binary downloads
    pub fn download() -> Self {
        Self::with_retries(DEFAULT_DOWNLOAD_RETRIES)
    }

    /// Default 5s + up to 5s jitter with a custom ceiling
    pub fn with_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: Duration::from_millis(5000),
            jitter: Duration::from_millis(5000),
        }
    }

    /// Roll a fresh delay inside `[base_delay, base_delay + jitter)`
    pub fn next_delay(&self) -> Duration {
        let jitter_ms = self.jitter.as_millis() as u64;
        let extra = if jitter_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..jitter_ms)
        };
        self.base_delay + Duration::from_millis(extra)
    }
}

/// reqwest client wrapper that applies a [`RetryPolicy`] per call
#[derive(Debug, Clone)]
pub struct RetryingClient {
    client: reqwest::Client,
}

impl RetryingClient {
    /// Build a client with a fixed user agent and per-request timeout
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }

    /// Wrap an existing reqwest client
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// GET `url` with query parameters and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        policy: &RetryPolicy,
    ) -> Result<T, FetchError> {
        let response = self
            .send_with_retry(url, || self.client.get(url).query(query), policy)
            .await?;

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }

    /// GET `url` and return the raw body bytes
    pub async fn download(&self, url: &str, policy: &RetryPolicy) -> Result<Vec<u8>, FetchError> {
        let response = self
            .send_with_retry(url, || self.client.get(url), policy)
            .await?;

        Ok(response.bytes().await?.to_vec())
    }

    async fn send_with_retry<F>(
        &self,
        url: &str,
        build: F,
        policy: &RetryPolicy,
    ) -> Result<Response, FetchError>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut retries_left = policy.max_retries;

        loop {
            let response = build().send().await?;
            let status = response.status();

            if status.is_success() {
                return Ok(response);
            }

            if is_retryable(status) && retries_left > 0 {
                let wait = policy.next_delay();
                warn!(
                    %status,
                    url,
                    retries_left,
                    "Rate limited (or server error). Retrying in {}ms...",
                    wait.as_millis()
                );
                tokio::time::sleep(wait).await;
                retries_left -= 1;
                continue;
            }

            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }
    }
}
