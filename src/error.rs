use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Convenience result type for [`crate::workflow::UploadWorkflow`] events.
pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Error type returned by ingestion functions.
///
/// This is a single error enum shared across CSV and (optional) Excel ingestion.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// The file extension is not one of `csv`, `xlsx`, `xls`. No parsing was attempted.
    #[error("unsupported file format '{extension}' (expected csv, xlsx or xls)")]
    UnsupportedFormat { extension: String },

    /// Underlying I/O error while reading the selected file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The bytes could not be decoded as CSV.
    #[error("csv parse error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "excel")]
    /// The bytes could not be decoded as a workbook (feature-gated behind `excel`).
    #[error("excel parse error: {0}")]
    Excel(#[from] calamine::Error),
}

impl IngestionError {
    /// `true` when the bytes were read but did not decode as the declared format.
    pub fn is_parse_error(&self) -> bool {
        match self {
            IngestionError::Csv(err) => !matches!(err.kind(), csv::ErrorKind::Io(_)),
            #[cfg(feature = "excel")]
            IngestionError::Excel(_) => true,
            IngestionError::UnsupportedFormat { .. } | IngestionError::Io(_) => false,
        }
    }
}

/// Errors returned when an event cannot be applied to the upload workflow.
///
/// Every error that reaches the user is also posted to the workflow's notification channel;
/// the returned value lets callers react programmatically.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Reading or decoding the selected file failed.
    #[error(transparent)]
    Ingestion(#[from] IngestionError),

    /// Another read or submission is still in flight.
    #[error("workflow is busy ({state})")]
    Busy { state: &'static str },

    /// Bytes arrived for a selection that has since been cancelled or replaced.
    #[error("read result does not belong to the current selection")]
    StaleRead,

    /// Confirm was issued for a dataset with zero rows while empty submissions are disallowed.
    #[error("dataset has no rows to submit")]
    EmptySubmission,

    /// Confirm was issued outside a Tokio runtime, so the submitter call has nowhere to run.
    #[error("no tokio runtime available to run the submission")]
    NoRuntime,
}
