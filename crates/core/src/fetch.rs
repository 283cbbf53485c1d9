//! Static HTML fetching over plain HTTP.
//!
//! The cheap first tier of the pipeline: one GET with browser-like headers
//! and a hard timeout. Anything other than a 2xx body is reported as a
//! [`ExtractError::FetchFailed`] so the orchestrator can escalate to the
//! headless renderer instead of retrying here.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::{ExtractError, Result};

/// HTTP client configuration for the static fetch tier.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// User-Agent header sent with the request.
    pub user_agent: String,
    /// Accept header sent with the request.
    pub accept: String,
    /// Accept-Language header sent with the request.
    pub accept_language: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: 10,
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36"
                .to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
        }
    }
}

/// Raw HTTP response for one fetched page.
///
/// Owned exclusively by the call that fetched it and dropped once the static
/// parsers are done with the markup.
#[derive(Debug, Clone)]
pub struct RawPage {
    /// Response body as HTML text.
    pub html: String,
    /// Effective URL after redirects.
    pub final_url: Url,
    /// HTTP status code observed.
    pub status: u16,
    /// Content-Type header, if present.
    pub content_type: Option<String>,
}

/// Fetches the static markup of a page.
///
/// Object trait so that tests can substitute a counting mock for the real
/// HTTP client.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Performs one GET of `url` and returns the raw page on any 2xx status.
    async fn fetch(&self, url: &Url) -> Result<RawPage>;
}

/// [`PageFetcher`] backed by a reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    config: FetchConfig,
}

impl HttpFetcher {
    /// Builds a fetcher with its own connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::FetchFailed`] if the underlying client cannot
    /// be constructed (e.g. no TLS backend available).
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(|e| ExtractError::FetchFailed(e.to_string()))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<RawPage> {
        let response = self
            .client
            .get(url.clone())
            .header("User-Agent", &self.config.user_agent)
            .header("Accept", &self.config.accept)
            .header("Accept-Language", &self.config.accept_language)
            // Cache-busting: always fetch the live page, never a stale copy.
            .header("Cache-Control", "no-cache")
            .header("Pragma", "no-cache")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExtractError::FetchFailed(format!(
                        "request timed out after {} seconds",
                        self.config.timeout
                    ))
                } else {
                    ExtractError::FetchFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::FetchFailed(format!("HTTP {status}")));
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let html = response
            .text()
            .await
            .map_err(|e| ExtractError::FetchFailed(e.to_string()))?;

        Ok(RawPage { html, final_url, status: status.as_u16(), content_type })
    }
}
