// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Unknown suite: {0}")]
    UnknownSuite(String),

    #[error("Invalid notebook URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid notebook filename: {0}")]
    InvalidFilename(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
