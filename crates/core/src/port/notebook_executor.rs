// Notebook Executor Port
// Abstraction for running all cells of a notebook via an external tool.
// Exit status is the contract surface: 0 = pass, non-zero = fail.

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Result of executing a notebook
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub status: ExecutionStatus,
    pub duration_ms: i64,
    /// None when the child was killed by a signal.
    pub exit_code: Option<i32>,
    /// Captured stderr (stdout is discarded).
    pub stderr: Option<String>,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.status == ExecutionStatus::Success
    }
}

/// Execution status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionStatus {
    Success,
    Failed,
}

/// Execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("Wall-clock timeout after {0}s")]
    Timeout(u64),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Notebook Executor trait
///
/// Implementations:
/// - NbconvertExecutor: spawns `jupyter nbconvert` with execution enabled
#[async_trait]
pub trait NotebookExecutor: Send + Sync {
    /// Execute all cells of the notebook at `path` and return the result.
    ///
    /// A non-zero exit from the tool is NOT an error; it is an
    /// `ExecutionResult` with `ExecutionStatus::Failed`. Errors are
    /// reserved for the tool not running at all or exceeding the
    /// wall-clock limit.
    ///
    /// # Errors
    /// - `ExecutionError::SpawnFailed` if the tool cannot be started
    /// - `ExecutionError::Timeout` if the wall-clock limit expires
    async fn execute(&self, path: &Path) -> Result<ExecutionResult, ExecutionError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock executor behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Always succeed (exit 0)
        Success,
        /// Always fail with the given exit code
        ExitCode(i32),
        /// Fail to spawn
        SpawnError(String),
        /// Time out after N seconds (reported, not actually waited)
        Timeout(u64),
    }

    /// Mock Notebook Executor for testing
    pub struct MockNotebookExecutor {
        behavior: MockBehavior,
        call_count: Arc<Mutex<usize>>,
    }

    impl MockNotebookExecutor {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior,
                call_count: Arc::new(Mutex::new(0)),
            }
        }

        pub fn new_success() -> Self {
            Self::new(MockBehavior::Success)
        }

        pub fn new_exit_code(code: i32) -> Self {
            Self::new(MockBehavior::ExitCode(code))
        }

        pub fn call_count(&self) -> usize {
            *self.call_count.lock().unwrap()
        }
    }

    #[async_trait]
    impl NotebookExecutor for MockNotebookExecutor {
        async fn execute(&self, _path: &Path) -> Result<ExecutionResult, ExecutionError> {
            *self.call_count.lock().unwrap() += 1;

            match &self.behavior {
                MockBehavior::Success => Ok(ExecutionResult {
                    status: ExecutionStatus::Success,
                    duration_ms: 100,
                    exit_code: Some(0),
                    stderr: None,
                }),
                MockBehavior::ExitCode(code) => Ok(ExecutionResult {
                    status: ExecutionStatus::Failed,
                    duration_ms: 100,
                    exit_code: Some(*code),
                    stderr: Some("mock execution failure".to_string()),
                }),
                MockBehavior::SpawnError(msg) => Err(ExecutionError::SpawnFailed(msg.clone())),
                MockBehavior::Timeout(secs) => Err(ExecutionError::Timeout(*secs)),
            }
        }
    }
}
