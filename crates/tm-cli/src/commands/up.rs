//! Up command implementation

use anyhow::Result;

use crate::cli::GlobalArgs;
use crate::commands::common::{join_versions, load_project, migration_failure, open_ledger};

/// Execute the up command
pub(crate) fn execute(global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let ledger = open_ledger(&project, global)?;

    let applied = tm_migrate::migrate_up(&project.script_source(), &ledger)
        .map_err(|e| migration_failure(e, "Migration failed"))?;

    match applied.last() {
        Some(version) => {
            println!(
                "Applied {} migration(s): {}",
                applied.len(),
                join_versions(&applied)
            );
            println!("Current version: {}", version);
        }
        None => println!("Already up to date"),
    }
    Ok(())
}
