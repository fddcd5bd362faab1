//! Tabular file parsing for bulk imports.
//!
//! `parse(bytes, format)` turns a CSV or XLSX upload into a sequence of row
//! mappings keyed by the (trimmed, lower-cased) header of the first row.

mod csv_reader;
mod xlsx_reader;

use std::path::Path;

use serde_json::{Map, Value};
use thiserror::Error;

/// One data row, keyed by normalized header name
pub type Row = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabularFormat {
    Csv,
    Xlsx,
}

#[derive(Debug, Error)]
pub enum TabularError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to read spreadsheet: {0}")]
    Spreadsheet(String),
}

/// ZIP local file header; every XLSX starts with it
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

impl TabularFormat {
    /// Pick the format from the upload's file name, falling back to content sniffing
    pub fn detect(filename: Option<&str>, bytes: &[u8]) -> Result<Self, TabularError> {
        let extension = filename
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase());

        match extension.as_deref() {
            Some("csv") | Some("txt") => Ok(TabularFormat::Csv),
            Some("xlsx") | Some("xlsm") => Ok(TabularFormat::Xlsx),
            Some(other) => Err(TabularError::UnsupportedFormat(format!(".{}", other))),
            None if bytes.starts_with(ZIP_MAGIC) => Ok(TabularFormat::Xlsx),
            None => Ok(TabularFormat::Csv),
        }
    }
}

/// Parse a whole file into rows. Blank rows are dropped.
pub fn parse(bytes: &[u8], format: TabularFormat) -> Result<Vec<Row>, TabularError> {
    let rows = match format {
        TabularFormat::Csv => csv_reader::read_rows(bytes)?,
        TabularFormat::Xlsx => xlsx_reader::read_rows(bytes)?,
    };

    Ok(rows
        .into_iter()
        .filter(|row| row.values().any(|v| !is_blank(v)))
        .collect())
}

pub(crate) fn normalize_header(header: &str) -> String {
    header.trim().trim_start_matches('\u{feff}').trim().to_lowercase()
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}
