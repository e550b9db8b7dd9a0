// Port Layer - Interfaces for external dependencies

pub mod notebook_executor;
pub mod notebook_fetcher;
pub mod time_provider;

// Re-exports
pub use notebook_executor::{ExecutionError, ExecutionResult, ExecutionStatus, NotebookExecutor};
pub use notebook_fetcher::{FetchError, NotebookFetcher};
pub use time_provider::TimeProvider;
