//! Version ledger capability traits

use crate::error::DbResult;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Version reported by an empty ledger
pub const NO_VERSION: i64 = -1;

/// One applied-version entry in the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionRecord {
    /// Version id of the applied migration
    pub version_id: i64,

    /// When the version was applied; orders "most recent"
    pub applied_on: DateTime<Utc>,

    /// Description copied from the migration at apply time
    pub description: String,
}

/// Read-only access to the applied-version history.
pub trait VersionReader {
    /// Version with the most recent `applied_on`, or [`NO_VERSION`] when the
    /// ledger is empty.
    fn current_version(&self) -> DbResult<i64>;

    /// `(current, previous)` by descending `applied_on`.
    ///
    /// `previous` is [`NO_VERSION`] with fewer than two records; both are
    /// [`NO_VERSION`] when the ledger is empty.
    fn previous_version(&self) -> DbResult<(i64, i64)>;

    /// Newest `applied_on` in the ledger, or `None` when it is empty.
    fn latest_applied_on(&self) -> DbResult<Option<DateTime<Utc>>>;
}

/// Schema changes and ledger writes.
pub trait VersionWriter {
    /// Execute statements in order, stopping at the first failure.
    ///
    /// Statements before the failing one stay applied.
    fn apply_changes(&self, statements: &[String]) -> DbResult<()>;

    /// Record that `version` was applied at `applied_on`.
    fn add_version(&self, version: i64, description: &str, applied_on: DateTime<Utc>)
        -> DbResult<()>;

    /// Delete every record for `version`. Removing an absent version succeeds.
    fn remove_version(&self, version: i64) -> DbResult<()>;
}

/// Full ledger capability: reading and writing.
pub trait VersionLedger: VersionReader + VersionWriter {}

impl<T: VersionReader + VersionWriter + ?Sized> VersionLedger for T {}
