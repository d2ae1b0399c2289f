#![cfg(feature = "excel")]

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use crate::error::IngestionResult;
use crate::types::{TabularDataset, Value};

use super::grid::rows_from_grid;

/// Ingest workbook bytes (`.xlsx`, `.xls`, ...) into an in-memory `TabularDataset`.
///
/// Behavior:
/// - The container format is sniffed from the bytes, not the extension
/// - Only the first sheet is read; other sheets are ignored
/// - Detects the first non-empty row as the header row
/// - Cells keep their native type (number, bool, text); dates and error cells become text
/// - A workbook without sheets yields an empty dataset
pub fn ingest_excel_from_bytes(bytes: &[u8]) -> IngestionResult<TabularDataset> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => return Ok(TabularDataset::empty()),
    };

    let grid: Vec<Vec<Value>> = range
        .rows()
        .map(|row| row.iter().map(convert_cell).collect())
        .collect();

    Ok(rows_from_grid(grid))
}

fn convert_cell(c: &Data) -> Value {
    match c {
        Data::Empty => Value::Null,
        Data::String(s) => Value::text(s.as_str()),
        Data::Int(i) => Value::Int64(*i),
        Data::Float(f) => Value::Float64(*f),
        Data::Bool(b) => Value::Bool(*b),
        _ => Value::text(c.to_string()),
    }
}
