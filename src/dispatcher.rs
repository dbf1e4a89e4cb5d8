//! Command dispatcher that routes parsed CLI commands to their handlers.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::cli::{formatters, Commands};
use crate::compare::{compare, sort_by_market_perf, Comparison, SortOrder};
use crate::config::Config;
use crate::export::{export_to_path, SnapshotLabels};
use crate::snapshot::{decode_bytes, inspect_header, load_snapshot, Snapshot};

/// Route a parsed command to its handler
pub fn dispatch_command(command: Commands, config: &Config, json_output: bool) -> Result<()> {
    match command {
        Commands::Compare {
            older,
            newer,
            sort,
            export,
        } => dispatch_compare(&older, &newer, sort.order(), export, config, json_output),
        Commands::Inspect { file } => dispatch_inspect(&file, config),
    }
}

/// Load both snapshots, compare them and print (and optionally export) the result.
///
/// Either snapshot failing to load aborts before any computation.
pub fn dispatch_compare(
    older: &Path,
    newer: &Path,
    sort: Option<SortOrder>,
    export: Option<PathBuf>,
    config: &Config,
    json_output: bool,
) -> Result<()> {
    let before = load(older, config)?;
    let after = load(newer, config)?;

    let comparison = compare(&before.records, &after.records);
    let labels = SnapshotLabels::new(before.label.clone(), after.label.clone());
    info!(
        "Compared {} holdings ({} -> {})",
        comparison.rows.len(),
        labels.older,
        labels.newer
    );

    if let Some(path) = export.as_deref() {
        export_to_path(path, &comparison, &labels, &config.locale)?;
    }

    let mut rows = comparison.rows.clone();
    if let Some(order) = sort {
        sort_by_market_perf(&mut rows, order);
    }

    if json_output {
        let sorted = Comparison {
            rows,
            summary: comparison.summary.clone(),
        };
        println!("{}", formatters::format_comparison_json(&sorted, &labels));
        return Ok(());
    }

    for snapshot in [&before, &after] {
        if let Some(note) = formatters::format_load_note(snapshot) {
            println!("{}", note);
        }
    }

    if rows.is_empty() {
        print!("{}", formatters::format_empty_comparison());
    } else {
        print!("{}", formatters::format_comparison_table(&rows, &labels));
    }
    print!("{}", formatters::format_summary(&comparison.summary, &labels));

    if let Some(path) = export {
        println!("\n✓ Report saved to {}", path.display());
    }

    Ok(())
}

/// Show the header and column mapping of a snapshot file
pub fn dispatch_inspect(file: &Path, config: &Config) -> Result<()> {
    let bytes =
        std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let content = decode_bytes(&bytes);
    let info = inspect_header(&content, config)
        .with_context(|| format!("Failed to inspect {}", file.display()))?;

    print!(
        "{}",
        formatters::format_header_info(&file.display().to_string(), &info)
    );
    Ok(())
}

fn load(path: &Path, config: &Config) -> Result<Snapshot> {
    load_snapshot(path, config)
        .with_context(|| format!("Could not load snapshot {}", path.display()))
}
