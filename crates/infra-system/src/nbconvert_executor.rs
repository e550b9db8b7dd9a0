// Notebook executor implementation
// Spawns `jupyter nbconvert` with a structured argument vector; no
// shell string is ever built. Stdout is discarded, stderr captured.
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{info, warn};

use nbsmoke_core::application::constants::{DEFAULT_CELL_TIMEOUT_SECS, WALL_CLOCK_GRACE_SECS};
use nbsmoke_core::port::{
    ExecutionError, ExecutionResult, ExecutionStatus, NotebookExecutor, TimeProvider,
};

const DEFAULT_PROGRAM: &str = "jupyter";

/// Executes notebooks by spawning the nbconvert tool.
///
/// The tool is told to execute all cells with its own per-cell timeout;
/// on top of that this executor enforces a wall-clock limit and kills
/// the child when it expires.
pub struct NbconvertExecutor {
    time_provider: Arc<dyn TimeProvider>,
    program: String,
    cell_timeout_secs: u64,
    wall_timeout: Duration,
}

impl NbconvertExecutor {
    /// Create an executor with the default program and 300s cell timeout.
    pub fn new(time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            time_provider,
            program: DEFAULT_PROGRAM.to_string(),
            cell_timeout_secs: DEFAULT_CELL_TIMEOUT_SECS,
            wall_timeout: Duration::from_secs(DEFAULT_CELL_TIMEOUT_SECS + WALL_CLOCK_GRACE_SECS),
        }
    }

    /// Set the per-cell timeout; the wall-clock limit follows it.
    pub fn with_cell_timeout(mut self, secs: u64) -> Self {
        self.cell_timeout_secs = secs;
        self.wall_timeout = Duration::from_secs(secs + WALL_CLOCK_GRACE_SECS);
        self
    }

    /// Override the wall-clock limit independently of the cell timeout.
    pub fn with_wall_timeout(mut self, wall_timeout: Duration) -> Self {
        self.wall_timeout = wall_timeout;
        self
    }

    /// Substitute the execution tool (used by tests to run a stub).
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn build_args(&self, path: &Path) -> Vec<String> {
        vec![
            "nbconvert".to_string(),
            "--stdout".to_string(),
            "--ExecutePreprocessor.enabled=True".to_string(),
            format!("--ExecutePreprocessor.timeout={}", self.cell_timeout_secs),
            path.display().to_string(),
        ]
    }

    /// Spawn the tool and wait for it, killing it if the wall-clock
    /// limit expires.
    async fn spawn_and_wait(
        &self,
        args: &[String],
    ) -> Result<std::process::Output, ExecutionError> {
        let child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ExecutionError::SpawnFailed(e.to_string()))?;

        match timeout(self.wall_timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) => Err(ExecutionError::IoError(e.to_string())),
            // kill_on_drop reaps the child here
            Err(_) => Err(ExecutionError::Timeout(self.wall_timeout.as_secs())),
        }
    }

    fn build_result(&self, output: std::process::Output, duration_ms: i64) -> ExecutionResult {
        let status = if output.status.success() {
            ExecutionStatus::Success
        } else {
            ExecutionStatus::Failed
        };

        let stderr = if output.stderr.is_empty() {
            None
        } else {
            Some(String::from_utf8_lossy(&output.stderr).to_string())
        };

        ExecutionResult {
            status,
            duration_ms,
            exit_code: output.status.code(),
            stderr,
        }
    }
}

#[async_trait]
impl NotebookExecutor for NbconvertExecutor {
    async fn execute(&self, path: &Path) -> Result<ExecutionResult, ExecutionError> {
        let start_time = self.time_provider.now_millis();
        let args = self.build_args(path);

        info!(
            program = %self.program,
            notebook = %path.display(),
            cell_timeout_secs = self.cell_timeout_secs,
            wall_timeout_secs = self.wall_timeout.as_secs(),
            "Starting notebook execution"
        );

        let output = self.spawn_and_wait(&args).await?;

        let duration_ms = self.time_provider.now_millis() - start_time;
        let result = self.build_result(output, duration_ms);

        if result.success() {
            info!(
                notebook = %path.display(),
                duration_ms,
                "Notebook execution completed"
            );
        } else {
            warn!(
                notebook = %path.display(),
                exit_code = ?result.exit_code,
                duration_ms,
                "Notebook execution failed"
            );
        }

        Ok(result)
    }
}
