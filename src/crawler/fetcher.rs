//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests of a run:
//! - Building the HTTP client with a proper user agent string
//! - GET requests returning the raw page body
//! - Bounded retry on bad gateway responses

use crate::config::{FetcherConfig, UserAgentConfig};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors returned by the fetcher
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error for {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Bad gateway for {url}, gave up after {attempts} attempts")]
    GatewayExhausted { url: String, attempts: u32 },

    #[error("Failed to read body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },
}

impl FetchError {
    /// Returns the HTTP status for status errors
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use nppa_isbn::config::{FetcherConfig, UserAgentConfig};
/// use nppa_isbn::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    config: &FetcherConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Returns true for statuses worth another attempt
fn is_transient(status: StatusCode) -> bool {
    status == StatusCode::BAD_GATEWAY
}

/// Sequential page fetcher
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | HTTP 2xx | Return body |
/// | HTTP 502 | Sleep `retry_delay`, retry up to `max_attempts` total |
/// | Other status | Immediate `Status` error |
/// | Network error | Immediate `Network` error |
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    max_attempts: u32,
    retry_delay: Duration,
}

impl Fetcher {
    /// Creates a fetcher from configuration
    pub fn new(user_agent: &UserAgentConfig, config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(user_agent, config)?;
        Ok(Self::with_client(
            client,
            config.max_attempts,
            Duration::from_millis(config.retry_delay_ms),
        ))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client, max_attempts: u32, retry_delay: Duration) -> Self {
        Self {
            client,
            max_attempts,
            retry_delay,
        }
    }

    /// Fetches the body of `url`
    pub async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        for attempt in 1..=self.max_attempts {
            tracing::debug!("GET {} (attempt {})", url, attempt);

            let response =
                self.client
                    .get(url.clone())
                    .send()
                    .await
                    .map_err(|source| FetchError::Network {
                        url: url.to_string(),
                        source,
                    })?;

            let status = response.status();
            if is_transient(status) {
                if attempt == self.max_attempts {
                    tracing::warn!("{} returned {} on the last attempt", url, status);
                    break;
                }
                tracing::warn!(
                    "{} returned {}, retrying in {:?} ({}/{})",
                    url,
                    status,
                    self.retry_delay,
                    attempt,
                    self.max_attempts
                );
                tokio::time::sleep(self.retry_delay).await;
                continue;
            }

            if !status.is_success() {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }

            let body = response.bytes().await.map_err(|source| FetchError::Body {
                url: url.to_string(),
                source,
            })?;
            return Ok(body.to_vec());
        }

        Err(FetchError::GatewayExhausted {
            url: url.to_string(),
            attempts: self.max_attempts,
        })
    }

    /// Fetches `url` and decodes the body as UTF-8, replacing invalid bytes
    pub async fn fetch_text(&self, url: &Url) -> Result<String, FetchError> {
        let body = self.fetch(url).await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}
