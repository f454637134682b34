use std::result::Result as StdResult;
use thiserror::Error;

/// Errors that can occur when preparing test fixtures.
#[derive(Debug, Error)]
pub enum TestInfraError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("path is not valid UTF-8: {0}")]
    NonUtf8Path(String),
}

/// A type alias for `Result` with `TestInfraError`.
pub type Result<T> = StdResult<T, TestInfraError>;
