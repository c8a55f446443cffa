//! Status command implementation

use anyhow::{Context, Result};
use serde::Serialize;
use tm_db::{VersionRecord, NO_VERSION};

use crate::cli::{GlobalArgs, StatusArgs, StatusOutput};
use crate::commands::common::{join_versions, load_project, open_ledger};

/// Everything `tm status` reports
#[derive(Debug, Serialize)]
struct StatusReport {
    current: i64,
    previous: i64,
    applied: Vec<VersionRecord>,
    pending: Vec<i64>,
    available: usize,
}

/// Execute the status command
pub(crate) fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let ledger = open_ledger(&project, global)?;

    let status = tm_migrate::status(&project.script_source(), &ledger)
        .context("Failed to compute migration status")?;
    let applied = ledger.records().context("Failed to read ledger")?;

    let report = StatusReport {
        current: status.current,
        previous: status.previous,
        applied,
        pending: status.pending,
        available: status.available,
    };

    match args.output {
        StatusOutput::Table => print_table(&report),
        StatusOutput::Json => print_json(&report)?,
    }
    Ok(())
}

fn display_version(version: i64) -> String {
    if version == NO_VERSION {
        "none".to_string()
    } else {
        version.to_string()
    }
}

fn print_table(report: &StatusReport) {
    println!("Current version:  {}", display_version(report.current));
    println!("Previous version: {}", display_version(report.previous));
    println!();

    if report.applied.is_empty() {
        println!("No versions applied");
    } else {
        let version_width = report
            .applied
            .iter()
            .map(|r| r.version_id.to_string().len())
            .max()
            .unwrap_or(7)
            .max(7);
        let applied_width = 26;

        println!(
            "{:<version_width$}  {:<applied_width$}  DESCRIPTION",
            "VERSION", "APPLIED_ON",
        );
        println!("{}", "-".repeat(version_width + applied_width + 15));
        for record in &report.applied {
            println!(
                "{:<version_width$}  {:<applied_width$}  {}",
                record.version_id,
                record.applied_on.format("%Y-%m-%d %H:%M:%S%.3f UTC"),
                record.description,
            );
        }
    }

    println!();
    if report.pending.is_empty() {
        println!("Up to date ({} migration(s) known)", report.available);
    } else {
        println!(
            "Pending ({} of {}): {}",
            report.pending.len(),
            report.available,
            join_versions(&report.pending)
        );
    }
}

fn print_json(report: &StatusReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize to JSON")?;
    println!("{}", json);
    Ok(())
}
