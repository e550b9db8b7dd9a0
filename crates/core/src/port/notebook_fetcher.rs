// Notebook Fetcher Port
// Abstraction over the "download the notebook into the workdir" step.

use crate::domain::NotebookRef;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fetch errors
///
/// Transport failures, HTTP-level failures, and local write failures
/// are kept distinct so callers can report them separately.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network error fetching {url}: {message}")]
    Network { url: String, message: String },

    #[error("HTTP status {status} fetching {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("IO error writing {path}: {message}")]
    Io { path: String, message: String },
}

/// Notebook Fetcher trait
///
/// Implementations:
/// - HttpFetcher: single-attempt HTTP(S) GET (no retry, no verification)
#[async_trait]
pub trait NotebookFetcher: Send + Sync {
    /// Fetch a notebook into `dest_dir` and return the path of the
    /// written file (`dest_dir` joined with the notebook's filename).
    ///
    /// # Errors
    /// - `FetchError::Network` if the request could not complete
    /// - `FetchError::HttpStatus` on a non-2xx response
    /// - `FetchError::Io` if the body could not be written locally
    async fn fetch(&self, notebook: &NotebookRef, dest_dir: &Path) -> Result<PathBuf, FetchError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock fetcher behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Write a stub file with the given contents
        WriteFile(String),
        /// Fail with a network error
        NetworkError,
        /// Fail with an HTTP status
        HttpStatus(u16),
    }

    /// Mock Notebook Fetcher for testing
    pub struct MockNotebookFetcher {
        behavior: MockBehavior,
        call_count: Arc<Mutex<usize>>,
    }

    impl MockNotebookFetcher {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior,
                call_count: Arc::new(Mutex::new(0)),
            }
        }

        /// Fetcher that writes a minimal stub notebook file.
        pub fn new_success() -> Self {
            Self::new(MockBehavior::WriteFile("{\"cells\": []}".to_string()))
        }

        pub fn new_network_error() -> Self {
            Self::new(MockBehavior::NetworkError)
        }

        pub fn new_http_status(status: u16) -> Self {
            Self::new(MockBehavior::HttpStatus(status))
        }

        pub fn call_count(&self) -> usize {
            *self.call_count.lock().unwrap()
        }
    }

    #[async_trait]
    impl NotebookFetcher for MockNotebookFetcher {
        async fn fetch(
            &self,
            notebook: &NotebookRef,
            dest_dir: &Path,
        ) -> Result<PathBuf, FetchError> {
            *self.call_count.lock().unwrap() += 1;

            match &self.behavior {
                MockBehavior::WriteFile(contents) => {
                    let path = dest_dir.join(notebook.filename());
                    tokio::fs::write(&path, contents)
                        .await
                        .map_err(|e| FetchError::Io {
                            path: path.display().to_string(),
                            message: e.to_string(),
                        })?;
                    Ok(path)
                }
                MockBehavior::NetworkError => Err(FetchError::Network {
                    url: notebook.url(),
                    message: "mock network error".to_string(),
                }),
                MockBehavior::HttpStatus(status) => Err(FetchError::HttpStatus {
                    url: notebook.url(),
                    status: *status,
                }),
            }
        }
    }
}
