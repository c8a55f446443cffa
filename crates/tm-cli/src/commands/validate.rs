//! Validate command implementation

use anyhow::{Context, Result};
use tm_core::ScriptSource;

use crate::cli::GlobalArgs;
use crate::commands::common::load_project;

/// Execute the validate command
pub(crate) fn execute(global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    println!("Validating project: {}\n", project.config.name);

    let definitions = project
        .script_source()
        .load_all()
        .context("Migration files are invalid")?;

    let (Some(first), Some(last)) = (definitions.first(), definitions.last()) else {
        println!("No migrations found in: {}", project.config.migration_paths.join(", "));
        return Ok(());
    };

    for definition in &definitions {
        if definition.down_statements.is_empty() {
            log::warn!(
                "Version {} has no down statements; reverting it only removes its ledger record",
                definition.version
            );
        }
        println!(
            "  {:>6}  up: {:<3} down: {:<3} {}",
            definition.version,
            definition.up_statements.len(),
            definition.down_statements.len(),
            definition.description
        );
    }

    println!();
    println!(
        "{} migration(s) OK, versions {} to {}",
        definitions.len(),
        first.version,
        last.version
    );
    Ok(())
}
