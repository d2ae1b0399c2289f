//! Column inference for ingested datasets.

use crate::types::{ColumnDef, TabularDataset};

/// Derive the dataset's columns from the keys of its first row, in encounter order.
///
/// Later rows are not inspected: a row whose key set differs from the first row's keeps its
/// extra keys out of the column list, and missing keys render as empty cells. Rows produced by
/// [`crate::ingestion::ingest`] always share the header's key set.
pub fn derive_columns(dataset: &TabularDataset) -> Vec<ColumnDef> {
    dataset
        .first()
        .map(|row| row.keys().map(ColumnDef::new).collect())
        .unwrap_or_default()
}
