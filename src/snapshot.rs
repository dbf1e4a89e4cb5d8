//! Snapshot loader
//!
//! Turns a raw portfolio export into a clean set of [`HoldingRecord`]s.
//! Only three columns matter (holding name, value in reporting currency and
//! closing price); which source columns carry them is decided by the
//! [`ColumnSchema`](crate::config::ColumnSchema).
//!
//! Rows whose value cannot be parsed are dropped; rows whose price cannot be
//! parsed are kept without a price. A missing column or an unreadable file
//! aborts the whole load.

use csv::ReaderBuilder;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::{ColumnSchema, Config};
use crate::error::LoadFailure;
use crate::locale::LocaleProfile;

/// One holding in one snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoldingRecord {
    pub name: String,
    pub total_value: Decimal,
    pub price: Option<Decimal>,
}

impl HoldingRecord {
    pub fn new(name: impl Into<String>, total_value: Decimal, price: Option<Decimal>) -> Self {
        Self {
            name: name.into(),
            total_value,
            price,
        }
    }
}

/// A row dropped because its value was not a number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// Line number in the source file (header is line 1)
    pub line: usize,
    pub name: String,
    pub raw_value: String,
}

/// A loaded snapshot
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// File stem of the source, used to label report columns
    pub label: String,
    /// One record per distinct holding name, in first-appearance order
    pub records: Vec<HoldingRecord>,
    pub skipped: Vec<SkippedRow>,
}

/// Column positions resolved from the header
#[derive(Debug)]
struct ColumnMapping {
    name: usize,
    value: usize,
    price: usize,
}

/// Header analysis of a snapshot file, used by `inspect`
#[derive(Debug, Clone)]
pub struct HeaderInfo {
    pub delimiter: u8,
    pub headers: Vec<String>,
    /// (logical field, source column, position if found)
    pub fields: Vec<(&'static str, String, Option<usize>)>,
}

impl HeaderInfo {
    pub fn missing(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|(_, _, idx)| idx.is_none())
            .map(|(_, column, _)| column.clone())
            .collect()
    }
}

/// Load a snapshot file from disk
pub fn load_snapshot<P: AsRef<Path>>(path: P, config: &Config) -> Result<Snapshot, LoadFailure> {
    let path = path.as_ref();
    info!("Loading snapshot: {:?}", path);

    let bytes = std::fs::read(path)?;
    let content = decode_bytes(&bytes);
    load_from_str(&content, &snapshot_label(path), config)
}

/// Load a snapshot from already-decoded text
pub fn load_from_str(content: &str, label: &str, config: &Config) -> Result<Snapshot, LoadFailure> {
    let delimiter = detect_delimiter(content, &config.locale)?;
    debug!("Using field separator {:?}", delimiter as char);

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let mapping = find_columns(&headers, &config.columns)?;
    debug!("Column mapping: {:?}", mapping);

    let mut records = Vec::new();
    let mut skipped = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        let line = idx + 2;

        let name = record.get(mapping.name).unwrap_or("").to_string();
        let raw_value = record.get(mapping.value).unwrap_or("");

        let Some(total_value) = config.locale.parse_decimal(raw_value) else {
            debug!("Skipping line {} ({:?}): value {:?} is not a number", line, name, raw_value);
            skipped.push(SkippedRow {
                line,
                name,
                raw_value: raw_value.to_string(),
            });
            continue;
        };

        let price = record
            .get(mapping.price)
            .and_then(|cell| config.locale.parse_decimal(cell));

        records.push(HoldingRecord {
            name,
            total_value,
            price,
        });
    }

    let parsed = records.len();
    let records = consolidate(records);

    info!(
        "Loaded {} holdings from '{}' ({} rows skipped)",
        records.len(),
        label,
        skipped.len()
    );
    if records.len() < parsed {
        warn!(
            "'{}' contains {} duplicate holding row(s); values were summed",
            label,
            parsed - records.len()
        );
    }

    Ok(Snapshot {
        label: label.to_string(),
        records,
        skipped,
    })
}

/// Analyse the header of a snapshot without loading rows
pub fn inspect_header(content: &str, config: &Config) -> Result<HeaderInfo, LoadFailure> {
    let delimiter = detect_delimiter(content, &config.locale)?;
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(content.as_bytes());
    let headers = reader.headers()?.clone();

    let fields = schema_fields(&config.columns)
        .into_iter()
        .map(|(field, column)| {
            let idx = column_index(&headers, column);
            (field, column.to_string(), idx)
        })
        .collect();

    Ok(HeaderInfo {
        delimiter,
        headers: headers.iter().map(|h| h.to_string()).collect(),
        fields,
    })
}

/// Merge records sharing a name into one, kept at the position of the
/// first occurrence. Values are summed (saturating); the last known price
/// wins.
pub fn consolidate(records: impl IntoIterator<Item = HoldingRecord>) -> Vec<HoldingRecord> {
    let mut merged: Vec<HoldingRecord> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        match index.get(&record.name) {
            Some(&pos) => {
                let existing = &mut merged[pos];
                existing.total_value = existing.total_value.saturating_add(record.total_value);
                if record.price.is_some() {
                    existing.price = record.price;
                }
            }
            None => {
                index.insert(record.name.clone(), merged.len());
                merged.push(record);
            }
        }
    }

    merged
}

/// Decode raw file bytes: UTF-8 (BOM stripped), falling back to
/// Windows-1252 for spreadsheet-saved exports.
pub fn decode_bytes(bytes: &[u8]) -> String {
    let (text, _, had_errors) = encoding_rs::UTF_8.decode(bytes);
    if !had_errors {
        return text.into_owned();
    }
    debug!("Input is not valid UTF-8, decoding as Windows-1252");
    let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    text.into_owned()
}

/// Label for a snapshot file: the file name up to its first dot
pub fn snapshot_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .and_then(|name| name.split('.').next().map(|s| s.to_string()))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "snapshot".to_string())
}

fn detect_delimiter(content: &str, locale: &LocaleProfile) -> Result<u8, LoadFailure> {
    let header_line = content
        .lines()
        .find(|line| !line.trim().is_empty())
        .ok_or(LoadFailure::Empty)?;
    Ok(locale.resolve_field_separator(header_line))
}

fn schema_fields(schema: &ColumnSchema) -> [(&'static str, &str); 3] {
    [
        ("name", schema.name.as_str()),
        ("value", schema.value.as_str()),
        ("price", schema.price.as_str()),
    ]
}

fn column_index(headers: &csv::StringRecord, column: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == column)
}

fn find_columns(
    headers: &csv::StringRecord,
    schema: &ColumnSchema,
) -> Result<ColumnMapping, LoadFailure> {
    let [name, value, price] =
        schema_fields(schema).map(|(_, column)| (column, column_index(headers, column)));

    match (name, value, price) {
        ((_, Some(name)), (_, Some(value)), (_, Some(price))) => Ok(ColumnMapping {
            name,
            value,
            price,
        }),
        (name, value, price) => {
            let missing = [name, value, price]
                .into_iter()
                .filter(|(_, idx)| idx.is_none())
                .map(|(column, _)| column.to_string())
                .collect();
            Err(LoadFailure::MissingColumns { missing })
        }
    }
}
