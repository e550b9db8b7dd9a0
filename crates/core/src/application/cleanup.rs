// Scoped cleanup guard for fetched notebook files
// The file must be gone after processing whether execution succeeded,
// failed, or panicked. Removal is best-effort (rm -f semantics).

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Owns a fetched file and guarantees its removal.
///
/// Call `remove().await` on the normal path; `Drop` covers early
/// returns and panics with a synchronous best-effort removal.
pub struct FetchedFile {
    path: Option<PathBuf>,
}

impl FetchedFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Remove the file now. Errors are logged and swallowed.
    pub async fn remove(mut self) {
        if let Some(path) = self.path.take() {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => debug!(path = %path.display(), "Removed fetched notebook"),
                Err(e) => warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to remove fetched notebook (ignored)"
                ),
            }
        }
    }
}

impl Drop for FetchedFile {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            if let Err(e) = std::fs::remove_file(&path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to remove fetched notebook on drop (ignored)"
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_remove_deletes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nb.ipynb");
        tokio::fs::write(&path, "{}").await.unwrap();

        let guard = FetchedFile::new(path.clone());
        guard.remove().await;

        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_drop_deletes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nb.ipynb");
        tokio::fs::write(&path, "{}").await.unwrap();

        {
            let _guard = FetchedFile::new(path.clone());
        }

        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_remove_of_missing_file_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let guard = FetchedFile::new(dir.path().join("never-written.ipynb"));
        guard.remove().await; // must not panic
    }
}
