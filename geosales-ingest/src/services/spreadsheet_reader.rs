//! Spreadsheet reader
//!
//! Decodes the first worksheet of an uploaded workbook (.xlsx, .xls, .ods)
//! into raw rows. The first row is the header; each following row becomes a
//! [`RawRow`] keyed by header text. Empty cells are left out and rows with
//! no values at all are dropped.

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use serde_json::{Number, Value};
use std::io::Cursor;
use thiserror::Error;

use crate::models::RawRow;

/// MIME types accepted for upload
pub const SPREADSHEET_MIME_TYPES: &[&str] = &[
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-excel",
    "application/vnd.oasis.opendocument.spreadsheet",
];

#[derive(Debug, Error)]
pub enum SpreadsheetError {
    #[error("Could not open workbook: {0}")]
    Open(String),

    #[error("Workbook has no worksheets")]
    NoWorksheet,

    #[error("Could not read worksheet: {0}")]
    Read(String),
}

pub fn is_spreadsheet_mime(mime: &str) -> bool {
    SPREADSHEET_MIME_TYPES.contains(&mime)
}

/// Decode workbook bytes into raw rows from its first worksheet
pub fn read_first_sheet(bytes: Vec<u8>) -> Result<Vec<RawRow>, SpreadsheetError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| SpreadsheetError::Open(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SpreadsheetError::NoWorksheet)?
        .map_err(|e| SpreadsheetError::Read(e.to_string()))?;

    Ok(rows_from_range(&range))
}

/// Convert a cell range (header row first) into raw rows
pub fn rows_from_range(range: &Range<Data>) -> Vec<RawRow> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Vec::new();
    };

    let headers: Vec<Option<String>> = header
        .iter()
        .map(|cell| match cell_value(cell) {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        })
        .collect();

    rows.filter_map(|cells| {
        let row: RawRow = headers
            .iter()
            .zip(cells)
            .filter_map(|(header, cell)| {
                let header = header.as_ref()?;
                match cell_value(cell) {
                    Value::Null => None,
                    value => Some((header.clone(), value)),
                }
            })
            .collect();
        (!row.is_empty()).then_some(row)
    })
    .collect()
}

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::String(s) => Value::String(s.clone()),
        Data::Int(i) => Value::Number((*i).into()),
        Data::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => Number::from_f64(dt.as_f64())
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
        Data::Error(_) => Value::Null,
    }
}
