//! Error types for tm-db

use thiserror::Error;

/// Ledger and schema operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Statement execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Ledger query error (D003)
    #[error("[D003] Ledger query failed: {0}")]
    QueryError(String),

    /// Ledger write error (D004)
    #[error("[D004] Ledger write failed: {0}")]
    WriteError(String),

    /// Internal error (D007)
    #[error("[D007] Internal database error: {0}")]
    Internal(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

