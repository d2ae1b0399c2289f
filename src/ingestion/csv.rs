//! CSV ingestion implementation.

use crate::error::IngestionResult;
use crate::types::{TabularDataset, Value};

use super::grid::rows_from_grid;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Ingest CSV bytes into an in-memory [`TabularDataset`].
///
/// Rules:
///
/// - The first non-empty record is the header; later records are keyed by it positionally.
/// - Records may have differing lengths.
/// - Every cell is text; empty cells become [`Value::Null`].
/// - A leading UTF-8 byte order mark is ignored.
pub fn ingest_csv_from_bytes(bytes: &[u8], delimiter: u8) -> IngestionResult<TabularDataset> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(bytes);
    ingest_csv_from_reader(&mut rdr)
}

/// Ingest CSV data from an existing CSV reader.
///
/// The reader should be built with `has_headers(false)`; header detection happens here.
pub fn ingest_csv_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> IngestionResult<TabularDataset> {
    let mut grid: Vec<Vec<Value>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        grid.push(record.iter().map(Value::text).collect());
    }
    Ok(rows_from_grid(grid))
}
