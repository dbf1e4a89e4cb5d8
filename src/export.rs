//! Export of a comparison as delimiter-separated text
//!
//! Layout (default locale, so `;` between fields and `,` for decimals):
//!
//! ```text
//! Product;Total_Value_<older>;Price_<older>;Total_Value_<newer>;Price_<newer>;Wealth_Change;Market_Perf
//! ```
//!
//! A market performance that cannot be computed is written as an empty cell.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::compare::Comparison;
use crate::locale::LocaleProfile;

/// Labels of the two snapshots, used in the header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotLabels {
    pub older: String,
    pub newer: String,
}

impl SnapshotLabels {
    /// Build labels, adding `_1`/`_2` when both snapshots share a name
    pub fn new(older: impl Into<String>, newer: impl Into<String>) -> Self {
        let older = older.into();
        let newer = newer.into();
        if older == newer {
            Self {
                older: format!("{}_1", older),
                newer: format!("{}_2", newer),
            }
        } else {
            Self { older, newer }
        }
    }
}

pub fn header(labels: &SnapshotLabels) -> Vec<String> {
    vec![
        "Product".to_string(),
        format!("Total_Value_{}", labels.older),
        format!("Price_{}", labels.older),
        format!("Total_Value_{}", labels.newer),
        format!("Price_{}", labels.newer),
        "Wealth_Change".to_string(),
        "Market_Perf".to_string(),
    ]
}

/// Write the full reconciled set to `writer`
pub fn write_comparison<W: Write>(
    writer: W,
    comparison: &Comparison,
    labels: &SnapshotLabels,
    locale: &LocaleProfile,
) -> Result<(), csv::Error> {
    let mut csv_writer = WriterBuilder::new()
        .delimiter(locale.export_separator)
        .from_writer(writer);

    csv_writer.write_record(header(labels))?;

    for row in &comparison.rows {
        csv_writer.write_record([
            row.name.clone(),
            locale.format_export(row.value_before),
            locale.format_export(row.price_before),
            locale.format_export(row.value_after),
            locale.format_export(row.price_after),
            locale.format_export(row.wealth_change),
            row.market_perf_pct
                .map(|pct| locale.format_export(pct))
                .unwrap_or_default(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write the comparison to a file, replacing it if present
pub fn export_to_path(
    path: &Path,
    comparison: &Comparison,
    labels: &SnapshotLabels,
    locale: &LocaleProfile,
) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create export file {:?}", path))?;
    write_comparison(file, comparison, labels, locale)
        .with_context(|| format!("Failed to write export file {:?}", path))?;

    info!("Exported {} rows to {:?}", comparison.rows.len(), path);
    Ok(())
}
