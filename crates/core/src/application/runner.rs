// SmokeRunner - sequential fetch / execute / cleanup loop
// One notebook is in flight at a time; nothing is retried.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::application::cleanup::FetchedFile;
use crate::domain::{NotebookOutcome, NotebookRef, OutcomeKind, RunReport, Suite, SuiteReport};
use crate::port::{ExecutionError, NotebookExecutor, NotebookFetcher, TimeProvider};

/// How much captured stderr to keep in an outcome's detail field.
const STDERR_TAIL_CHARS: usize = 2000;

/// Runs notebook suites sequentially against injected ports.
pub struct SmokeRunner {
    fetcher: Arc<dyn NotebookFetcher>,
    executor: Arc<dyn NotebookExecutor>,
    time_provider: Arc<dyn TimeProvider>,
    workdir: PathBuf,
}

impl SmokeRunner {
    pub fn new(
        fetcher: Arc<dyn NotebookFetcher>,
        executor: Arc<dyn NotebookExecutor>,
        time_provider: Arc<dyn TimeProvider>,
        workdir: PathBuf,
    ) -> Self {
        Self {
            fetcher,
            executor,
            time_provider,
            workdir,
        }
    }

    /// Run every suite in order and aggregate the reports.
    pub async fn run(&self, suites: &[Suite]) -> RunReport {
        let mut reports = Vec::with_capacity(suites.len());
        for suite in suites {
            reports.push(self.run_suite(suite).await);
        }
        RunReport::new(reports)
    }

    /// Run one suite. A notebook failure does not stop the remaining
    /// notebooks; it is recorded and the loop continues.
    pub async fn run_suite(&self, suite: &Suite) -> SuiteReport {
        info!(suite = %suite.name, notebooks = suite.notebooks.len(), "Running suite");

        let mut report = SuiteReport::new(&suite.name);
        for notebook in &suite.notebooks {
            report.push(self.run_notebook(notebook).await);
        }

        info!(suite = %suite.name, passed = report.passed(), "Suite finished");
        report
    }

    /// Process a single notebook: fetch, execute, classify, clean up.
    /// The fetched file is removed on every path.
    pub async fn run_notebook(&self, notebook: &NotebookRef) -> NotebookOutcome {
        let started = self.time_provider.now_millis();

        info!(
            notebook = %notebook.filename(),
            url = %notebook.url(),
            "Fetching notebook"
        );

        let path = match self.fetcher.fetch(notebook, &self.workdir).await {
            Ok(path) => path,
            Err(e) => {
                warn!(notebook = %notebook.filename(), error = %e, "Fetch failed");
                // A partial file may exist even when the fetch failed.
                FetchedFile::new(self.workdir.join(notebook.filename()))
                    .remove()
                    .await;
                return NotebookOutcome {
                    notebook: notebook.filename().to_string(),
                    outcome: OutcomeKind::DownloadFailed,
                    duration_ms: self.time_provider.now_millis() - started,
                    detail: Some(e.to_string()),
                };
            }
        };

        let guard = FetchedFile::new(path.clone());

        info!(notebook = %notebook.filename(), "Executing notebook");
        let outcome = match self.executor.execute(&path).await {
            Ok(result) if result.success() => OutcomeKind::Passed,
            Ok(result) => {
                warn!(
                    notebook = %notebook.filename(),
                    exit_code = ?result.exit_code,
                    "Notebook execution failed"
                );
                let detail = result.stderr.as_deref().map(stderr_tail);
                guard.remove().await;
                return NotebookOutcome {
                    notebook: notebook.filename().to_string(),
                    outcome: OutcomeKind::ExecutionFailed {
                        exit_code: result.exit_code,
                    },
                    duration_ms: self.time_provider.now_millis() - started,
                    detail,
                };
            }
            Err(ExecutionError::Timeout(limit_secs)) => {
                warn!(notebook = %notebook.filename(), limit_secs, "Notebook timed out");
                OutcomeKind::TimedOut { limit_secs }
            }
            Err(e) => {
                warn!(notebook = %notebook.filename(), error = %e, "Executor error");
                guard.remove().await;
                return NotebookOutcome {
                    notebook: notebook.filename().to_string(),
                    outcome: OutcomeKind::ExecutionFailed { exit_code: None },
                    duration_ms: self.time_provider.now_millis() - started,
                    detail: Some(e.to_string()),
                };
            }
        };

        guard.remove().await;

        NotebookOutcome {
            notebook: notebook.filename().to_string(),
            outcome,
            duration_ms: self.time_provider.now_millis() - started,
            detail: None,
        }
    }
}

fn stderr_tail(stderr: &str) -> String {
    let trimmed = stderr.trim_end();
    if trimmed.chars().count() <= STDERR_TAIL_CHARS {
        return trimmed.to_string();
    }
    let skip = trimmed.chars().count() - STDERR_TAIL_CHARS;
    trimmed.chars().skip(skip).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::notebook_executor::mocks::{MockBehavior as ExecBehavior, MockNotebookExecutor};
    use crate::port::notebook_fetcher::mocks::MockNotebookFetcher;
    use crate::port::time_provider::SystemTimeProvider;

    fn notebook() -> NotebookRef {
        NotebookRef::new("https://example.com/repo/", "demo.ipynb").unwrap()
    }

    fn runner(
        fetcher: MockNotebookFetcher,
        executor: MockNotebookExecutor,
        workdir: PathBuf,
    ) -> SmokeRunner {
        SmokeRunner::new(
            Arc::new(fetcher),
            Arc::new(executor),
            Arc::new(SystemTimeProvider),
            workdir,
        )
    }

    #[tokio::test]
    async fn test_pass_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let r = runner(
            MockNotebookFetcher::new_success(),
            MockNotebookExecutor::new_success(),
            dir.path().to_path_buf(),
        );

        let outcome = r.run_notebook(&notebook()).await;

        assert_eq!(outcome.outcome, OutcomeKind::Passed);
        assert!(!dir.path().join("demo.ipynb").exists());
    }

    #[tokio::test]
    async fn test_nonzero_exit_fails_and_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let r = runner(
            MockNotebookFetcher::new_success(),
            MockNotebookExecutor::new_exit_code(2),
            dir.path().to_path_buf(),
        );

        let outcome = r.run_notebook(&notebook()).await;

        assert_eq!(
            outcome.outcome,
            OutcomeKind::ExecutionFailed { exit_code: Some(2) }
        );
        assert!(!dir.path().join("demo.ipynb").exists());
    }

    #[tokio::test]
    async fn test_fetch_failure_is_distinct_and_skips_execution() {
        let dir = tempfile::tempdir().unwrap();
        let executor = Arc::new(MockNotebookExecutor::new_success());
        let r = SmokeRunner::new(
            Arc::new(MockNotebookFetcher::new_network_error()),
            executor.clone(),
            Arc::new(SystemTimeProvider),
            dir.path().to_path_buf(),
        );

        let outcome = r.run_notebook(&notebook()).await;

        assert_eq!(outcome.outcome, OutcomeKind::DownloadFailed);
        assert!(outcome.detail.is_some());
        // The notebook was never executed and nothing was left behind.
        assert_eq!(executor.call_count(), 0);
        assert!(!dir.path().join("demo.ipynb").exists());
    }

    #[tokio::test]
    async fn test_http_404_is_download_failure() {
        let dir = tempfile::tempdir().unwrap();
        let r = runner(
            MockNotebookFetcher::new_http_status(404),
            MockNotebookExecutor::new_success(),
            dir.path().to_path_buf(),
        );

        let outcome = r.run_notebook(&notebook()).await;
        assert_eq!(outcome.outcome, OutcomeKind::DownloadFailed);
    }

    #[tokio::test]
    async fn test_timeout_outcome_and_cleanup() {
        let dir = tempfile::tempdir().unwrap();
        let r = runner(
            MockNotebookFetcher::new_success(),
            MockNotebookExecutor::new(ExecBehavior::Timeout(360)),
            dir.path().to_path_buf(),
        );

        let outcome = r.run_notebook(&notebook()).await;

        assert_eq!(outcome.outcome, OutcomeKind::TimedOut { limit_secs: 360 });
        assert!(!dir.path().join("demo.ipynb").exists());
    }

    #[tokio::test]
    async fn test_suite_continues_past_failures() {
        let dir = tempfile::tempdir().unwrap();
        let suite = Suite::new(
            "mixed",
            vec![
                NotebookRef::new("https://example.com/", "a.ipynb").unwrap(),
                NotebookRef::new("https://example.com/", "b.ipynb").unwrap(),
            ],
        );
        let executor = MockNotebookExecutor::new_exit_code(1);
        let r = runner(
            MockNotebookFetcher::new_success(),
            executor,
            dir.path().to_path_buf(),
        );

        let report = r.run_suite(&suite).await;

        assert_eq!(report.outcomes.len(), 2);
        assert!(!report.passed());
    }

    #[tokio::test]
    async fn test_run_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let suite = Suite::new("s", vec![notebook()]);
        let r = runner(
            MockNotebookFetcher::new_success(),
            MockNotebookExecutor::new_success(),
            dir.path().to_path_buf(),
        );

        let first = r.run(std::slice::from_ref(&suite)).await;
        let second = r.run(std::slice::from_ref(&suite)).await;

        assert!(first.passed());
        assert!(second.passed());
        assert!(!dir.path().join("demo.ipynb").exists());
    }

    #[test]
    fn test_stderr_tail_truncates_from_front() {
        let long = "x".repeat(STDERR_TAIL_CHARS + 10);
        let tail = stderr_tail(&long);
        assert_eq!(tail.chars().count(), STDERR_TAIL_CHARS);
    }
}
