//! CSV row loading and cleaning.
//!
//! Reads (date, close) rows from a header-carrying CSV source and applies the
//! cleaning policy once, at load time:
//! 1. A row whose date or close cell is missing or empty → dropped
//! 2. A present but unparseable date → hard error, the run aborts
//! 3. A present but non-numeric or non-finite close → dropped
//!
//! Order of surviving rows is source order; the loader never reorders.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::config::ConvertConfig;
use crate::domain::Row;

/// Errors from the loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("'{}' has no '{column}' column", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("row {row}: unparseable date '{value}'")]
    DateParse { row: usize, value: String },
}

/// Result of loading: surviving rows plus drop accounting.
#[derive(Debug, Clone)]
pub struct LoadReport {
    /// Cleaned rows, in source order.
    pub rows: Vec<Row>,
    /// Data rows seen in the source (header excluded).
    pub rows_read: usize,
    /// Rows removed by the cleaning policy.
    pub rows_dropped: usize,
}

/// Date spellings accepted from the source, tried in order. Timestamped
/// variants keep the calendar date and discard the time-of-day.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Cell spellings that count as a missing value rather than a parse failure.
const NA_SPELLINGS: &[&str] = &["NaN", "nan", "NA", "N/A", "null"];

fn is_missing(cell: &str) -> bool {
    cell.is_empty() || NA_SPELLINGS.contains(&cell)
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// Load and clean rows from a CSV file.
///
/// This is the only place a `Row` is constructed; everything downstream can
/// assume both fields are present. `rows_read` fixes the drop accounting and
/// `rows.len()` fixes the eventual MIF `DEPTH`.
pub fn load_rows(path: &Path, config: &ConvertConfig) -> Result<LoadReport, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let headers = reader.headers().map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let date_idx = column_index(headers, &config.date_column).ok_or_else(|| {
        LoadError::MissingColumn {
            path: path.to_path_buf(),
            column: config.date_column.clone(),
        }
    })?;
    let close_idx = column_index(headers, &config.close_column).ok_or_else(|| {
        LoadError::MissingColumn {
            path: path.to_path_buf(),
            column: config.close_column.clone(),
        }
    })?;

    let mut rows = Vec::new();
    let mut rows_read = 0usize;
    let mut rows_dropped = 0usize;

    for record in reader.records() {
        let record = record.map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        rows_read += 1;

        // Missing date cell → dropped. Present but unparseable → fatal:
        // dates are coerced, not filtered, so garbage in this column means
        // the source itself is wrong.
        let date_raw = record.get(date_idx).map(str::trim).unwrap_or("");
        if is_missing(date_raw) {
            rows_dropped += 1;
            continue;
        }
        let date = parse_date(date_raw).ok_or_else(|| LoadError::DateParse {
            row: rows_read,
            value: date_raw.to_string(),
        })?;

        // Close cell: missing, non-numeric, or non-finite → dropped.
        let close_raw = record.get(close_idx).map(str::trim).unwrap_or("");
        let close = match close_raw.parse::<f64>() {
            Ok(value) => value,
            Err(_) => {
                rows_dropped += 1;
                continue;
            }
        };

        let row = Row { date, close };
        if !row.has_finite_close() {
            rows_dropped += 1;
            continue;
        }
        rows.push(row);
    }

    Ok(LoadReport {
        rows,
        rows_read,
        rows_dropped,
    })
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == name)
}
