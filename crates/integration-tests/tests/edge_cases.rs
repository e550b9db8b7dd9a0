// Edge cases: download failures, wall-clock timeouts, stderr capture.
#![cfg(unix)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use nbsmoke_core::application::SmokeRunner;
use nbsmoke_core::domain::{NotebookRef, OutcomeKind, Suite};
use nbsmoke_core::port::notebook_fetcher::mocks::MockNotebookFetcher;
use nbsmoke_core::port::time_provider::SystemTimeProvider;
use nbsmoke_infra_system::NbconvertExecutor;

fn write_stub(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("stub-tool.sh");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

fn notebook() -> NotebookRef {
    NotebookRef::new("https://example.com/repo/", "demo.ipynb").unwrap()
}

#[tokio::test]
async fn unreachable_download_is_reported_distinctly_not_silently_passed() {
    let tooldir = tempfile::tempdir().unwrap();
    let workdir = tempfile::tempdir().unwrap();
    let stub = write_stub(tooldir.path(), "exit 0");

    let time_provider = Arc::new(SystemTimeProvider);
    let executor = Arc::new(
        NbconvertExecutor::new(time_provider.clone()).with_program(stub.display().to_string()),
    );
    let runner = SmokeRunner::new(
        Arc::new(MockNotebookFetcher::new_network_error()),
        executor,
        time_provider,
        workdir.path().to_path_buf(),
    );

    let report = runner.run_suite(&Suite::new("s", vec![notebook()])).await;

    assert!(!report.passed());
    assert_eq!(report.outcomes[0].outcome, OutcomeKind::DownloadFailed);
}

#[tokio::test]
async fn wall_clock_timeout_fails_and_cleans_up() {
    let tooldir = tempfile::tempdir().unwrap();
    let workdir = tempfile::tempdir().unwrap();
    let stub = write_stub(tooldir.path(), "sleep 30");

    let time_provider = Arc::new(SystemTimeProvider);
    let executor = Arc::new(
        NbconvertExecutor::new(time_provider.clone())
            .with_program(stub.display().to_string())
            .with_wall_timeout(Duration::from_millis(200)),
    );
    let runner = SmokeRunner::new(
        Arc::new(MockNotebookFetcher::new_success()),
        executor,
        time_provider,
        workdir.path().to_path_buf(),
    );

    let outcome = runner.run_notebook(&notebook()).await;

    assert!(matches!(outcome.outcome, OutcomeKind::TimedOut { .. }));
    assert!(!workdir.path().join("demo.ipynb").exists());
}

#[tokio::test]
async fn stderr_of_failing_tool_lands_in_outcome_detail() {
    let tooldir = tempfile::tempdir().unwrap();
    let workdir = tempfile::tempdir().unwrap();
    let stub = write_stub(tooldir.path(), "echo 'CellExecutionError' >&2\nexit 1");

    let time_provider = Arc::new(SystemTimeProvider);
    let executor = Arc::new(
        NbconvertExecutor::new(time_provider.clone()).with_program(stub.display().to_string()),
    );
    let runner = SmokeRunner::new(
        Arc::new(MockNotebookFetcher::new_success()),
        executor,
        time_provider,
        workdir.path().to_path_buf(),
    );

    let outcome = runner.run_notebook(&notebook()).await;

    assert_eq!(
        outcome.outcome,
        OutcomeKind::ExecutionFailed { exit_code: Some(1) }
    );
    assert!(outcome.detail.unwrap().contains("CellExecutionError"));
}

#[tokio::test]
async fn each_notebook_is_processed_independently() {
    // First notebook fails to download, the second still executes.
    let tooldir = tempfile::tempdir().unwrap();
    let workdir = tempfile::tempdir().unwrap();
    let stub = write_stub(tooldir.path(), "exit 0");

    let time_provider = Arc::new(SystemTimeProvider);
    let executor = Arc::new(
        NbconvertExecutor::new(time_provider.clone()).with_program(stub.display().to_string()),
    );

    // 404 for everything: both notebooks fail, but both are reported.
    let runner = SmokeRunner::new(
        Arc::new(MockNotebookFetcher::new_http_status(404)),
        executor,
        time_provider,
        workdir.path().to_path_buf(),
    );

    let suite = Suite::new(
        "pair",
        vec![
            NotebookRef::new("https://example.com/", "a.ipynb").unwrap(),
            NotebookRef::new("https://example.com/", "b.ipynb").unwrap(),
        ],
    );
    let report = runner.run_suite(&suite).await;

    assert_eq!(report.outcomes.len(), 2);
    assert!(report
        .outcomes
        .iter()
        .all(|o| o.outcome == OutcomeKind::DownloadFailed));
}
