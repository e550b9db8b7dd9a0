// Domain Layer - notebook references, suites, run reports

pub mod error;
pub mod notebook;
pub mod report;

pub use error::DomainError;
pub use notebook::{builtin_suites, NotebookRef, Suite};
pub use report::{NotebookOutcome, OutcomeKind, RunReport, SuiteReport};
