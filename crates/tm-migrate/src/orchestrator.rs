//! Forward and backward migration runs
//!
//! A forward run applies every pending definition in ascending order. Before
//! each step is applied, a frame holding its down statements is pushed onto
//! an [`UndoStack`]. When a step fails (either its statements or its ledger
//! record), the stack is unwound LIFO, executing each frame's down statements
//! and removing its ledger record, and the error that triggered it is returned.
//!
//! If unwinding itself fails the run stops immediately with
//! [`MigrateError::RollbackFailure`]; nothing further is attempted.

use crate::error::{MigrateError, MigrateResult};
use crate::plan::{pending_set, revert_step};
use crate::undo::UndoStack;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tm_core::{MigrationDefinition, ScriptSource};
use tm_db::{VersionReader, VersionWriter};

/// Seconds between the `applied_on` timestamps of consecutive steps in one run.
///
/// Keeps "most recent" well defined when statements finish faster than the
/// ledger's timestamp resolution.
pub const TIMESTAMP_STEP_SECS: i64 = 1;

/// Apply every pending migration, stamping records from the current time.
///
/// Returns the versions applied, in order. Empty when already up to date.
pub fn migrate_up<S, L>(source: &S, ledger: &L) -> MigrateResult<Vec<i64>>
where
    S: ScriptSource + ?Sized,
    L: VersionReader + VersionWriter + ?Sized,
{
    migrate_up_at(source, ledger, Utc::now())
}

/// [`migrate_up`] with an explicit earliest timestamp for the first step.
///
/// The first step is stamped at `started_at`, or one step after the newest
/// record already in the ledger when that is later, so records from this run
/// always sort after every earlier one.
pub fn migrate_up_at<S, L>(
    source: &S,
    ledger: &L,
    started_at: DateTime<Utc>,
) -> MigrateResult<Vec<i64>>
where
    S: ScriptSource + ?Sized,
    L: VersionReader + VersionWriter + ?Sized,
{
    let definitions = source.load_all()?;
    let current = read_current_version(ledger)?;

    let pending = pending_set(current, &definitions);
    if pending.is_empty() {
        log::info!("No pending migrations (current version: {})", current);
        return Ok(Vec::new());
    }

    let latest = ledger
        .latest_applied_on()
        .map_err(MigrateError::LedgerRead)?;
    let started_at = run_start(started_at, latest);

    log::info!("Migrating {} version(s)...", pending.len());
    apply_pending(ledger, pending, started_at)
}

/// Revert the ledger's current version using its down statements.
///
/// Returns the reverted version, or `None` when the ledger is empty.
pub fn migrate_down<S, L>(source: &S, ledger: &L) -> MigrateResult<Option<i64>>
where
    S: ScriptSource + ?Sized,
    L: VersionReader + VersionWriter + ?Sized,
{
    let definitions = source.load_all()?;
    let current = read_current_version(ledger)?;

    let Some(step) = revert_step(current, &definitions) else {
        log::info!("Ledger is empty, nothing to revert");
        return Ok(None);
    };

    if !step.definition_found {
        log::warn!(
            "No migration definition found for current version {}; removing its ledger record without running statements",
            step.version
        );
    }

    log::info!("Downgrading from version {}", step.version);
    revert(ledger, step.version, &step.down_statements)?;
    Ok(Some(step.version))
}

/// Current/previous versions and pending definitions, without writing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationStatus {
    /// Most recently applied version, or -1
    pub current: i64,

    /// Second most recently applied version, or -1
    pub previous: i64,

    /// Versions a forward run would apply, in order
    pub pending: Vec<i64>,

    /// Number of known definitions
    pub available: usize,
}

/// Report where the ledger stands relative to the script source.
pub fn status<S, R>(source: &S, reader: &R) -> MigrateResult<MigrationStatus>
where
    S: ScriptSource + ?Sized,
    R: VersionReader + ?Sized,
{
    let definitions = source.load_all()?;
    let (current, previous) = reader
        .previous_version()
        .map_err(MigrateError::LedgerRead)?;

    Ok(MigrationStatus {
        current,
        previous,
        pending: pending_set(current, &definitions)
            .iter()
            .map(|def| def.version)
            .collect(),
        available: definitions.len(),
    })
}

/// First timestamp of a run: `requested`, unless that would not sort after
/// `latest`.
fn run_start(requested: DateTime<Utc>, latest: Option<DateTime<Utc>>) -> DateTime<Utc> {
    match latest {
        Some(latest) => requested.max(latest + Duration::seconds(TIMESTAMP_STEP_SECS)),
        None => requested,
    }
}

fn read_current_version<R: VersionReader + ?Sized>(reader: &R) -> MigrateResult<i64> {
    reader.current_version().map_err(MigrateError::LedgerRead)
}

fn apply_pending<W: VersionWriter + ?Sized>(
    writer: &W,
    pending: &[MigrationDefinition],
    started_at: DateTime<Utc>,
) -> MigrateResult<Vec<i64>> {
    let mut undo = UndoStack::new();
    let mut applied = Vec::with_capacity(pending.len());
    let step = Duration::seconds(TIMESTAMP_STEP_SECS);
    let mut applied_on = started_at;

    for definition in pending {
        let version = definition.version;
        undo.push(definition);

        log::info!("Upgrading to version {}", version);
        if let Err(source) = writer.apply_changes(&definition.up_statements) {
            return Err(rollback(
                writer,
                &mut undo,
                MigrateError::Apply { version, source },
            ));
        }

        if let Err(source) = writer.add_version(version, &definition.description, applied_on) {
            return Err(rollback(
                writer,
                &mut undo,
                MigrateError::LedgerWrite { version, source },
            ));
        }

        applied.push(version);
        applied_on += step;
    }

    Ok(applied)
}

/// Unwind every frame on `undo`, returning the error the caller should see.
///
/// That is `cause` after a clean unwind, or a fatal
/// [`MigrateError::RollbackFailure`] as soon as any revert fails.
fn rollback<W: VersionWriter + ?Sized>(
    writer: &W,
    undo: &mut UndoStack,
    cause: MigrateError,
) -> MigrateError {
    log::warn!("{}", cause);
    log::warn!("Rolling back {} version(s)", undo.len());

    while let Some(frame) = undo.pop() {
        log::warn!("Reverting version {}", frame.version);
        if let Err(failed) = revert(writer, frame.version, &frame.down_statements) {
            let fatal = MigrateError::RollbackFailure {
                version: frame.version,
                failed: Box::new(failed),
                cause: Box::new(cause),
            };
            log::error!("{}", fatal);
            return fatal;
        }
    }

    cause
}

/// Run `down_statements` then remove the ledger record for `version`.
fn revert<W: VersionWriter + ?Sized>(
    writer: &W,
    version: i64,
    down_statements: &[String],
) -> MigrateResult<()> {
    writer
        .apply_changes(down_statements)
        .map_err(|source| MigrateError::Apply { version, source })?;
    writer
        .remove_version(version)
        .map_err(|source| MigrateError::LedgerWrite { version, source })?;
    Ok(())
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
