//! Error types for dt-db

use thiserror::Error;

/// Errors raised by the database layer
#[derive(Error, Debug)]
pub enum DbError {
    /// The database file could not be opened (D001)
    #[error("[D001] Cannot open database: {0}")]
    ConnectionError(String),

    /// A statement failed (D002)
    #[error("[D002] Statement failed: {0}")]
    ExecutionError(String),

    /// BEGIN or COMMIT failed (D003)
    #[error("[D003] Transaction failed: {0}")]
    TransactionError(String),

    /// The DDL has no equivalent on this backend (D004)
    #[error("[D004] {feature} is not supported by {backend}")]
    NotImplemented { backend: String, feature: String },

    /// Another thread panicked while holding the connection (D005)
    #[error("[D005] Connection lock poisoned: {0}")]
    MutexPoisoned(String),
}

/// Result alias for dt-db
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        DbError::ExecutionError(err.to_string())
    }
}
