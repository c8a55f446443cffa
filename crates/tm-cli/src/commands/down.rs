//! Down command implementation

use anyhow::{Context, Result};
use tm_db::{VersionReader, NO_VERSION};

use crate::cli::GlobalArgs;
use crate::commands::common::{load_project, migration_failure, open_ledger};

/// Execute the down command
pub(crate) fn execute(global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let ledger = open_ledger(&project, global)?;

    let reverted = tm_migrate::migrate_down(&project.script_source(), &ledger)
        .map_err(|e| migration_failure(e, "Downgrade failed"))?;

    let Some(version) = reverted else {
        println!("Nothing to revert");
        return Ok(());
    };

    let current = ledger
        .current_version()
        .context("Failed to read ledger")?;
    println!("Reverted version {}", version);
    if current == NO_VERSION {
        println!("No versions applied");
    } else {
        println!("Current version: {}", current);
    }
    Ok(())
}
