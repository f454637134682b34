//! Disposable fixtures for integration tests.

pub mod error;
pub mod sqlite;

pub use error::{Result, TestInfraError};
pub use sqlite::{SqliteFile, SqliteFileConfig};
