//! Output formatting module for CLI display
//!
//! This module handles all terminal output formatting, separating
//! the concerns of data calculation from presentation.

use colored::Colorize;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Style},
    Table, Tabled,
};

use crate::compare::{Comparison, PortfolioSummary, ReconciledRow};
use crate::export::SnapshotLabels;
use crate::locale::separator_name;
use crate::snapshot::{HeaderInfo, Snapshot};
use crate::utils::{format_currency, format_market_perf, format_percent};

const DESCRIPTION_WIDTH: usize = 58;
const VALUE_WIDTH: usize = 20;

/// Format a comparison for JSON output
pub fn format_comparison_json(comparison: &Comparison, labels: &SnapshotLabels) -> String {
    #[derive(Serialize)]
    struct JsonComparison<'a> {
        older: &'a str,
        newer: &'a str,
        rows: &'a [ReconciledRow],
        summary: &'a PortfolioSummary,
    }

    let payload = JsonComparison {
        older: &labels.older,
        newer: &labels.newer,
        rows: &comparison.rows,
        summary: &comparison.summary,
    };

    serde_json::to_string_pretty(&payload)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

/// Format reconciled rows for terminal table output
pub fn format_comparison_table(rows: &[ReconciledRow], labels: &SnapshotLabels) -> String {
    #[derive(Tabled)]
    struct ComparisonRow {
        #[tabled(rename = "Product")]
        product: String,
        #[tabled(rename = "Value at Snapshot #1")]
        value_before: String,
        #[tabled(rename = "Value at Snapshot #2")]
        value_after: String,
        #[tabled(rename = "Wealth +/-")]
        wealth_change: String,
        #[tabled(rename = "Market %")]
        market_perf: String,
    }

    let table_rows: Vec<ComparisonRow> = rows
        .iter()
        .map(|r| ComparisonRow {
            product: r.name.clone(),
            value_before: format_currency(r.value_before),
            value_after: format_currency(r.value_after),
            wealth_change: colorize_signed(r.wealth_change, format_currency(r.wealth_change)),
            market_perf: match r.market_perf_pct {
                Some(pct) => colorize_signed(pct, format_percent(pct)),
                None => format_market_perf(None),
            },
        })
        .collect();

    let mut output = format!(
        "\n{} Snapshot #1: {}   Snapshot #2: {}\n\n",
        "📊".cyan().bold(),
        labels.older.bold(),
        labels.newer.bold()
    );

    let mut table = Table::new(&table_rows);
    table.with(Style::modern());
    // Right-align money columns, keep Product left
    table.modify(Columns::new(1..4), Alignment::right());
    table.modify(Columns::new(4..5), Alignment::center());

    output.push_str(&table.to_string());
    output.push('\n');
    output
}

/// Fixed-width summary block
pub fn format_summary(summary: &PortfolioSummary, labels: &SnapshotLabels) -> String {
    let lines = [
        (
            format!("Total Value ({}):", labels.older),
            format_currency(summary.total_before),
            None,
        ),
        (
            format!("Total Value ({}):", labels.newer),
            format_currency(summary.total_after),
            None,
        ),
        (
            "Net Wealth Growth (deposits + gains):".to_string(),
            format_currency(summary.net_growth),
            Some(summary.net_growth),
        ),
        (
            "Market Performance (excludes deposits/withdrawals):".to_string(),
            format_percent(summary.weighted_market_return_pct),
            Some(summary.weighted_market_return_pct),
        ),
    ];

    let mut output = format!("\n{} Summary\n", "━".repeat(80).bright_black());
    for (description, value, sign) in lines {
        // pad before coloring so escape codes don't skew the columns
        let padded = format!("{:>width$}", value, width = VALUE_WIDTH);
        let value = match sign {
            Some(sign) => colorize_signed(sign, padded),
            None => padded,
        };
        output.push_str(&format!(
            "{:<width$} {}\n",
            description,
            value,
            width = DESCRIPTION_WIDTH
        ));
    }
    output
}

/// Note about rows dropped while loading, if any
pub fn format_load_note(snapshot: &Snapshot) -> Option<String> {
    if snapshot.skipped.is_empty() {
        return None;
    }
    let lines: Vec<String> = snapshot
        .skipped
        .iter()
        .map(|row| format!("line {} ({}): {:?}", row.line, row.name, row.raw_value))
        .collect();
    Some(format!(
        "{} {}: skipped {} row(s) without a numeric value: {}",
        "ℹ".blue().bold(),
        snapshot.label,
        snapshot.skipped.len(),
        lines.join(", ")
    ))
}

/// Message for a comparison with no holdings on either side
pub fn format_empty_comparison() -> String {
    format!(
        "{} No holdings found in either snapshot\n",
        "ℹ".blue().bold()
    )
}

/// Header report for `inspect`
pub fn format_header_info(file: &str, info: &HeaderInfo) -> String {
    let mut output = format!("{} Inspecting file: {}\n\n", "📊".cyan().bold(), file.green());
    output.push_str(&format!("  Field separator: {}\n", separator_name(info.delimiter)));
    output.push_str(&format!("  Columns ({}):\n", info.headers.len()));
    for (idx, header) in info.headers.iter().enumerate() {
        output.push_str(&format!("    {:>2}. {}\n", idx + 1, header.yellow()));
    }

    output.push_str("\n  Column mapping:\n");
    for (field, column, idx) in &info.fields {
        let status = match idx {
            Some(idx) => format!("found (column {})", idx + 1).green(),
            None => "MISSING".red().bold(),
        };
        output.push_str(&format!("    {:<6} <- {:<20} {}\n", field, column, status));
    }

    let missing = info.missing();
    if !missing.is_empty() {
        output.push_str(&format!(
            "\n{}\n",
            "Tip: map the missing fields in the [columns] section of your config file".blue()
        ));
    }
    output
}

fn colorize_signed(sign: Decimal, text: String) -> String {
    if sign > Decimal::ZERO {
        text.green().to_string()
    } else if sign < Decimal::ZERO {
        text.red().to_string()
    } else {
        text
    }
}
