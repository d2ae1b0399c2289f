//! Ingestion entrypoints and implementations.
//!
//! Most callers should use [`ingest`] (from [`unified`]) which:
//!
//! - dispatches on the file extension (`csv`, `xlsx`, `xls`; case-insensitive)
//! - decodes the already-read byte buffer into a [`crate::types::TabularDataset`]
//! - optionally reports success/failure/alerts to an [`IngestionObserver`]
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - [`excel`] (feature `excel`)

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
mod grid;
pub mod observability;
pub mod unified;

pub use observability::{
    CompositeObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats, TracingObserver,
};
pub use unified::{ingest, ingest_with_options, IngestionFormat, IngestionOptions, SUPPORTED_EXTENSIONS};
