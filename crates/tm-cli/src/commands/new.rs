//! New command implementation - scaffolds the next migration file

use anyhow::{Context, Result};
use std::fs;
use tm_core::ScriptSource;

use crate::cli::{GlobalArgs, NewArgs};
use crate::commands::common::load_project;

/// Execute the new command
pub(crate) fn execute(args: &NewArgs, global: &GlobalArgs) -> Result<()> {
    let slug = slugify(&args.description);
    if slug.is_empty() {
        anyhow::bail!(
            "Invalid description '{}': must contain at least one letter or digit",
            args.description
        );
    }

    let project = load_project(global)?;
    let definitions = project
        .script_source()
        .load_all()
        .context("Existing migration files are invalid")?;
    let version = next_version(definitions.last().map(|d| d.version))?;

    let Some(dir) = project.migration_dirs().into_iter().next() else {
        anyhow::bail!("No migration_paths configured");
    };
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let path = dir.join(file_name(version, &slug));
    if path.exists() {
        anyhow::bail!("File '{}' already exists", path.display());
    }
    fs::write(&path, template(version, &args.description))
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Created {}", path.display());
    Ok(())
}

/// Version following `highest`, starting at 1
fn next_version(highest: Option<i64>) -> Result<i64> {
    match highest {
        None => Ok(1),
        Some(v) => v.checked_add(1).with_context(|| {
            format!("No version follows {v}: the highest version is already the maximum")
        }),
    }
}

/// Lowercase words joined by underscores; everything else is dropped.
fn slugify(description: &str) -> String {
    description
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| word.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

fn file_name(version: i64, slug: &str) -> String {
    format!("{:04}_{}.yml", version, slug)
}

fn template(version: i64, description: &str) -> String {
    // Escape YAML special characters in the quoted description
    let safe_description = description.replace('\\', "\\\\").replace('"', "\\\"");
    format!(
        r#"version: {version}
description: "{description}"

# Statements run in order when migrating forward
up: []

# Statements that undo `up`, run when reverting this version
down: []
"#,
        version = version,
        description = safe_description,
    )
}

#[cfg(test)]
#[path = "new_test.rs"]
mod tests;
