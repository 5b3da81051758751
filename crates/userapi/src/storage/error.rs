//! Storage error types.

use sqlx::error::ErrorKind;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
///
/// A missing record is not an error; lookups return `None` instead.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A uniqueness or integrity constraint rejected the write.
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// Database driver or I/O failure.
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl StorageError {
    /// Classify a driver error, pulling constraint violations out of the
    /// generic database bucket. The only conversion from `sqlx::Error`.
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        match err.as_database_error() {
            Some(db_err) if !matches!(db_err.kind(), ErrorKind::Other) => {
                StorageError::Constraint(db_err.message().to_string())
            }
            _ => StorageError::Database(err),
        }
    }
}
