use thiserror::Error;

/// Result type for mapping store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Failures of the storage backend itself.
///
/// These are never expected during normal operation and are not retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
}

/// Everything a mapping store operation can fail with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("alias already exists: {0}")]
    DuplicateAlias(String),
    #[error("alias not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl StoreError {
    /// Whether the caller is expected to handle this error and carry on.
    ///
    /// Only [`StoreError::Storage`] is fatal.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_are_fatal() {
        let err = StoreError::from(StorageError::Unavailable("disk gone".into()));
        assert!(!err.is_recoverable());
        assert_eq!(err.to_string(), "storage backend unavailable: disk gone");
    }

    #[test]
    fn caller_errors_are_recoverable() {
        assert!(StoreError::Validation("empty".into()).is_recoverable());
        assert!(StoreError::DuplicateAlias("abc".into()).is_recoverable());
        assert!(StoreError::NotFound("abc".into()).is_recoverable());
    }
}
