//! Complaint CSV loading and cleaning.
//!
//! Raw exports use inconsistent headers ("Consumer complaint narrative",
//! "ZIP code", "Sub-product", ...). Cleaning maps them onto the typed
//! [`Record`] schema:
//! 1. Parse the first date column found
//! 2. Locate the narrative column, substituting "" for missing text
//! 3. Normalize column names (lowercase, `_` for spaces and hyphens)
//! 4. Keep only the known metadata columns

use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::complaints::{ComplaintMetadata, MetadataField, Record};

const NARRATIVE_COLUMN: &str = "consumer_complaint_narrative";

/// Date columns, tried in order. The first present one wins.
///
/// A bare `date` column also lands in `date_received`; it is only read when
/// neither received-date header exists.
const DATE_COLUMNS: [&str; 3] = ["date_received", "Date received", "date"];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"];

/// A CSV file as read from disk: headers plus string cells.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Read up to `sample_size` rows of a complaint CSV (all rows if `None`).
pub fn load_complaints(path: &Path, sample_size: Option<usize>) -> anyhow::Result<RawTable> {
    match sample_size {
        Some(n) => log::info!("Loading sample of {} rows from {}", n, path.display()),
        None => log::info!("Loading all rows from {}", path.display()),
    }

    let now = Instant::now();
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let headers = csv_reader
        .headers()
        .context("failed to read csv headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect::<Vec<_>>();

    let mut rows = vec![];
    for record in csv_reader.records() {
        if sample_size.is_some_and(|n| rows.len() >= n) {
            break;
        }
        let record = record.with_context(|| format!("malformed row {}", rows.len() + 1))?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }

    log::info!(
        "Successfully loaded {} records in {:?}",
        rows.len(),
        now.elapsed()
    );

    Ok(RawTable { headers, rows })
}

/// Normalize a raw header: lowercase, spaces and hyphens become `_`.
pub fn normalize_column(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// Parse a date cell. Unparseable values yield `None`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Some(datetime.date());
        }
    }

    None
}

/// Index of the narrative column: the one normalizing to
/// `consumer_complaint_narrative` if present, otherwise
/// the first column mentioning "narrative" or "complaint".
fn narrative_column(table: &RawTable) -> Option<usize> {
    let canonical = table
        .headers
        .iter()
        .position(|h| normalize_column(h) == NARRATIVE_COLUMN);

    canonical.or_else(|| {
        table.headers.iter().position(|h| {
            let lower = h.to_lowercase();
            lower.contains("narrative") || lower.contains("complaint")
        })
    })
}

/// Turn a raw table into records. Row order becomes record position.
pub fn clean_complaints(table: &RawTable) -> Vec<Record> {
    let date_col = DATE_COLUMNS.iter().find_map(|name| table.column(name));
    let narrative_col = narrative_column(table);
    if narrative_col.is_none() {
        log::warn!("No narrative column found, narratives will be empty");
    }

    let field_cols: Vec<(MetadataField, usize)> = table
        .headers
        .iter()
        .enumerate()
        .filter_map(|(idx, header)| {
            MetadataField::from_column(&normalize_column(header)).map(|field| (field, idx))
        })
        .collect();

    let records: Vec<Record> = table
        .rows
        .iter()
        .enumerate()
        .map(|(position, row)| {
            let cell = |idx: usize| row.get(idx).map(|v| v.trim()).filter(|v| !v.is_empty());

            let mut metadata = ComplaintMetadata::default();
            for (field, idx) in &field_cols {
                // first matching column wins, e.g. "Company" before "company"
                if metadata.get(*field).is_none() {
                    metadata.set(*field, cell(*idx).map(str::to_string));
                }
            }
            metadata.date_received = date_col.and_then(cell).and_then(parse_date);

            let narrative = narrative_col
                .and_then(|idx| row.get(idx))
                .cloned()
                .unwrap_or_default();

            Record {
                position,
                narrative,
                metadata,
            }
        })
        .collect();

    log::info!("Data cleaning complete. {} records", records.len());
    records
}
