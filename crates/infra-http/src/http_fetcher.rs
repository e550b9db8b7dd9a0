// HTTP fetcher implementation
// Single-attempt GET, body written to the working directory.
// No retry, no checksum verification, no caching.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use nbsmoke_core::domain::NotebookRef;
use nbsmoke_core::port::{FetchError, NotebookFetcher};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Fetches notebooks over HTTP(S) with reqwest.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with the default request timeout.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a fetcher with an explicit whole-request timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create HTTP client");
        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotebookFetcher for HttpFetcher {
    async fn fetch(&self, notebook: &NotebookRef, dest_dir: &Path) -> Result<PathBuf, FetchError> {
        let url = notebook.url();
        debug!(url = %url, "GET");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Network {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| FetchError::Network {
            url: url.clone(),
            message: e.to_string(),
        })?;

        let path = dest_dir.join(notebook.filename());
        tokio::fs::write(&path, &body)
            .await
            .map_err(|e| FetchError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        info!(
            url = %url,
            path = %path.display(),
            bytes = body.len(),
            "Notebook fetched"
        );

        Ok(path)
    }
}
