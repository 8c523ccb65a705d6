//! Downloading the raw CSV text.

use crate::error::DatasplitError;
use async_trait::async_trait;
use std::time::Duration;

/// Source of raw dataset text for an ingestion run.
#[async_trait]
pub trait RawDataFetcher: Send + Sync {
    /// Fetch the full body at `url` as UTF-8 text.
    async fn fetch(&self, url: &str) -> Result<String, DatasplitError>;
}

/// HTTP(S) fetcher backed by `reqwest`.
///
/// Issues a single GET with no retry. Non-success statuses are transport failures,
/// and so is a body that is not valid UTF-8.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Fetcher whose requests fail once `timeout` elapses.
    pub fn with_timeout(timeout: Duration) -> Result<Self, DatasplitError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DatasplitError::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    async fn get_text(&self, url: &str) -> Result<String, DatasplitError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| DatasplitError::transport(url, e))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| DatasplitError::transport(url, e))?;
        String::from_utf8(bytes.to_vec()).map_err(|e| DatasplitError::decode(url, e))
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RawDataFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, DatasplitError> {
        tracing::info!(url, "Downloading data");
        match self.get_text(url).await {
            Ok(body) => {
                tracing::info!(url, bytes = body.len(), "Download successful");
                Ok(body)
            }
            Err(e) => {
                tracing::error!(url, error = %e, "Failed to download data");
                Err(e)
            }
        }
    }
}
