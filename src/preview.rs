//! Read-only paged view over a dataset, for preview surfaces.

use crate::types::{ColumnDef, Row, TabularDataset};

/// Rows per preview page.
pub const PREVIEW_PAGE_SIZE: usize = 10;

/// What a preview grid renders: the dataset, its columns, and paging over the rows.
///
/// Borrowed from the workflow state via [`crate::workflow::WorkflowState::preview`]; the grid
/// has no way to modify either.
#[derive(Debug, Clone, Copy)]
pub struct Preview<'a> {
    dataset: &'a TabularDataset,
    columns: &'a [ColumnDef],
    page_size: usize,
}

impl<'a> Preview<'a> {
    /// Page over `dataset` with [`PREVIEW_PAGE_SIZE`] rows per page.
    pub fn new(dataset: &'a TabularDataset, columns: &'a [ColumnDef]) -> Self {
        Self::with_page_size(dataset, columns, PREVIEW_PAGE_SIZE)
    }

    /// Page with a custom page size (values below 1 are treated as 1).
    pub fn with_page_size(dataset: &'a TabularDataset, columns: &'a [ColumnDef], page_size: usize) -> Self {
        Self {
            dataset,
            columns,
            page_size: page_size.max(1),
        }
    }

    pub fn columns(&self) -> &'a [ColumnDef] {
        self.columns
    }

    pub fn dataset(&self) -> &'a TabularDataset {
        self.dataset
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn row_count(&self) -> usize {
        self.dataset.row_count()
    }

    /// Number of pages; zero for an empty dataset.
    pub fn page_count(&self) -> usize {
        self.dataset.row_count().div_ceil(self.page_size)
    }

    /// Rows on zero-based page `index`; empty past the last page.
    pub fn page(&self, index: usize) -> &'a [Row] {
        let rows = self.dataset.rows();
        let start = index.saturating_mul(self.page_size).min(rows.len());
        let end = start.saturating_add(self.page_size).min(rows.len());
        &rows[start..end]
    }

    /// Display text for every column of `row`, in column order. Missing keys render empty.
    pub fn cell_texts(&self, row: &Row) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| row.get(&c.name).map(ToString::to_string).unwrap_or_default())
            .collect()
    }
}
