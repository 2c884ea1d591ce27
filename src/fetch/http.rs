//! HTTP fetch collaborator backed by reqwest.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{CacheError, Result};
use crate::fetch::Fetcher;

// == Http Fetcher ==
/// Retrieves resources with a plain HTTP GET and returns the body text.
///
/// Non-success statuses still return their body; only transport failures
/// are errors.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fetcher over a preconfigured client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Creates a fetcher whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CacheError::Internal(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CacheError::Fetch(format!("{}: {}", url, e)))?;

        let status = response.status();
        if status.is_success() {
            debug!("GET {} -> {}", url, status);
        } else {
            warn!("GET {} -> {}", url, status);
        }

        response
            .text()
            .await
            .map_err(|e| CacheError::Fetch(format!("{}: {}", url, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_url_is_fetch_error() {
        let fetcher = HttpFetcher::new();

        let result = fetcher.fetch("not a url").await;

        assert!(matches!(result, Err(CacheError::Fetch(_))));
    }

    #[tokio::test]
    async fn test_with_timeout_builds_client() {
        assert!(HttpFetcher::with_timeout(Duration::from_secs(2)).is_ok());
    }
}
