// Run reports - per-notebook outcomes and suite aggregation

use serde::Serialize;

/// How a single notebook's smoke test ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutcomeKind {
    /// Execution tool exited 0.
    Passed,
    /// The fetch step failed; the notebook was never executed.
    /// Reported distinctly so a network problem cannot masquerade as a
    /// notebook regression.
    DownloadFailed,
    /// Execution tool exited non-zero (or was killed by a signal, in
    /// which case there is no exit code).
    ExecutionFailed { exit_code: Option<i32> },
    /// Wall-clock limit at the calling layer expired.
    TimedOut { limit_secs: u64 },
}

/// Result of processing one notebook.
#[derive(Debug, Clone, Serialize)]
pub struct NotebookOutcome {
    pub notebook: String,
    pub outcome: OutcomeKind,
    pub duration_ms: i64,
    /// Stderr tail or error message, for diagnostics only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl NotebookOutcome {
    pub fn passed(&self) -> bool {
        self.outcome == OutcomeKind::Passed
    }
}

/// Results for one suite, in processing order.
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub suite: String,
    pub outcomes: Vec<NotebookOutcome>,
}

impl SuiteReport {
    pub fn new(suite: impl Into<String>) -> Self {
        Self {
            suite: suite.into(),
            outcomes: Vec::new(),
        }
    }

    pub fn push(&mut self, outcome: NotebookOutcome) {
        self.outcomes.push(outcome);
    }

    /// True iff every notebook in the suite passed.
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(NotebookOutcome::passed)
    }
}

/// Results for a whole run (one or more suites).
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub suites: Vec<SuiteReport>,
}

impl RunReport {
    pub fn new(suites: Vec<SuiteReport>) -> Self {
        Self { suites }
    }

    pub fn passed(&self) -> bool {
        self.suites.iter().all(SuiteReport::passed)
    }

    pub fn total_notebooks(&self) -> usize {
        self.suites.iter().map(|s| s.outcomes.len()).sum()
    }

    pub fn failed_notebooks(&self) -> usize {
        self.suites
            .iter()
            .flat_map(|s| s.outcomes.iter())
            .filter(|o| !o.passed())
            .count()
    }
}
