//! Error types for tm-migrate

use thiserror::Error;
use tm_core::CoreError;
use tm_db::DbError;

/// Migration run errors
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Script source could not be loaded (M001)
    #[error("[M001] Failed to load migrations: {0}")]
    Load(#[from] CoreError),

    /// Ledger could not report the current version (M002)
    #[error("[M002] Failed to read ledger: {0}")]
    LedgerRead(#[source] DbError),

    /// Statements of a version failed to execute (M003)
    #[error("[M003] Failed to apply statements for version {version}: {source}")]
    Apply { version: i64, source: DbError },

    /// Ledger record for a version could not be added or removed (M004)
    #[error("[M004] Failed to update ledger for version {version}: {source}")]
    LedgerWrite { version: i64, source: DbError },

    /// Unwinding a failed forward run itself failed (M005).
    ///
    /// The schema and ledger are in an unknown state. The process must stop.
    #[error(
        "[M005] Rollback of version {version} failed: {failed}. \
         Schema and ledger may be inconsistent; unwinding was triggered by: {cause}"
    )]
    RollbackFailure {
        version: i64,
        #[source]
        failed: Box<MigrateError>,
        cause: Box<MigrateError>,
    },
}

impl MigrateError {
    /// Whether this error leaves the database in an unknown state and must
    /// halt the process.
    pub fn is_fatal(&self) -> bool {
        matches!(self, MigrateError::RollbackFailure { .. })
    }
}

/// Result type alias for MigrateError
pub type MigrateResult<T> = Result<T, MigrateError>;
