// nbsmoke Infrastructure - System Adapters
// Implements: NotebookExecutor

pub mod nbconvert_executor;

pub use nbconvert_executor::NbconvertExecutor;
