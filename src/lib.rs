//! `tabular-upload` turns a user-selected CSV or Excel file into an in-memory
//! [`types::TabularDataset`], derives its columns, and gates handing it to a submission
//! collaborator behind an explicit preview-and-confirm step.
//!
//! ## What you can upload
//!
//! **File formats (dispatched on the extension, case-insensitive):**
//!
//! - **CSV**: `.csv` (every cell is text)
//! - **Excel/workbooks** (Cargo feature `excel`, on by default): `.xlsx`, `.xls` (first sheet only;
//!   numbers and booleans keep their type)
//!
//! The first non-empty row is the header. Each following row becomes a [`types::Row`] keyed by the
//! header names. A file with only a header yields an empty dataset, not an error. Empty cells map
//! to [`types::Value::Null`].
//!
//! ## Quick example: ingest bytes
//!
//! ```rust
//! use tabular_upload::ingestion::ingest;
//! use tabular_upload::schema::derive_columns;
//! use tabular_upload::types::Value;
//!
//! # fn main() -> Result<(), tabular_upload::IngestionError> {
//! let ds = ingest(b"Name,Age\nAlice,30\n", "csv")?;
//! let columns = derive_columns(&ds);
//!
//! assert_eq!(ds.row_count(), 1);
//! assert_eq!(ds.rows()[0].get("Name"), Some(&Value::Utf8("Alice".to_string())));
//! assert_eq!(columns.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(), ["Name", "Age"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## The upload workflow
//!
//! [`workflow::UploadWorkflow`] owns the authoritative [`workflow::WorkflowState`]
//! (`Idle → Parsing → PreviewOpen → Submitting → Submitted | Error`), a single-slot
//! [`notification::NotificationChannel`], and at most one in-flight [`submit::Submitter`] call.
//! Presentation code reads the state (for example [`workflow::WorkflowState::preview`] for the
//! paged grid) and fires `select_*`, `confirm` and `cancel`; it never writes the state.
//!
//! ## Modules
//!
//! - [`ingestion`]: byte decoding for CSV and workbooks, plus observer hooks
//! - [`schema`]: column inference
//! - [`workflow`]: the selection/preview/submission state machine
//! - [`notification`]: single-slot transient messages
//! - [`submit`]: the submission collaborator contract
//! - [`preview`]: paged, read-only view for preview grids
//! - [`types`]: rows, datasets and descriptors
//! - [`error`]: error types

pub mod error;
pub mod ingestion;
pub mod notification;
pub mod preview;
pub mod schema;
pub mod submit;
pub mod types;
pub mod workflow;

pub use error::{IngestionError, IngestionResult, WorkflowError, WorkflowResult};
