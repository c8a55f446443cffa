//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use std::fmt;
use std::path::Path;
use tm_core::{Config, Project};
use tm_db::DuckDbLedger;
use tm_migrate::MigrateError;

use crate::cli::GlobalArgs;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that destructors (including the DuckDB connection) run first.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; never rendered to the user
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Exit status after a rollback failed and the database state is unknown
pub(crate) const EXIT_ROLLBACK_FAILURE: i32 = 2;

/// Load the project, honouring `--config` when given.
pub(crate) fn load_project(global: &GlobalArgs) -> Result<Project> {
    let root = Path::new(&global.project_dir);
    match &global.config {
        Some(config_path) => Project::load_with_config(root, Path::new(config_path)),
        None => Project::load(root),
    }
    .context("Failed to load project")
}

/// Open the ledger for the resolved target and make sure its table exists.
pub(crate) fn open_ledger(project: &Project, global: &GlobalArgs) -> Result<DuckDbLedger> {
    let target = Config::resolve_target(global.target.as_deref());
    if let Some(name) = &target {
        log::debug!("Using target '{}'", name);
    }

    let db_config = project
        .config
        .get_database_config(target.as_deref())
        .context("Failed to get database configuration")?;
    let db_path = resolve_db_path(&project.root, &db_config.path);
    log::debug!("Opening database {}", db_path);

    let ledger = DuckDbLedger::new(&db_path)
        .context("Failed to connect to database")?
        .with_table(&project.config.ledger_table)
        .context("Invalid ledger table")?;
    ledger
        .ensure_table()
        .context("Failed to prepare ledger table")?;
    Ok(ledger)
}

/// Relative database files live under the project root.
pub(crate) fn resolve_db_path(root: &Path, path: &str) -> String {
    if path == ":memory:" || Path::new(path).is_absolute() {
        path.to_string()
    } else {
        root.join(path).display().to_string()
    }
}

/// Turn a migration error into the error `main` reports.
///
/// A rollback failure has already been logged by the orchestrator and maps
/// to [`EXIT_ROLLBACK_FAILURE`]; anything else keeps its message chain.
pub(crate) fn migration_failure(err: MigrateError, action: &str) -> anyhow::Error {
    if err.is_fatal() {
        eprintln!("Error: {err}");
        eprintln!("Halting: schema and ledger must be repaired by hand before migrating again.");
        return ExitCode(EXIT_ROLLBACK_FAILURE).into();
    }
    anyhow::Error::new(err).context(action.to_string())
}

/// Join versions for display
pub(crate) fn join_versions(versions: &[i64]) -> String {
    versions
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
