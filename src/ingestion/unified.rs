//! Unified ingestion entrypoint.
//!
//! Most callers should use [`ingest`], which decodes an already-read byte buffer into a
//! [`crate::types::TabularDataset`] based on the file extension.
//!
//! - Extensions outside [`SUPPORTED_EXTENSIONS`] fail with
//!   [`IngestionError::UnsupportedFormat`] before any parsing.
//! - If an [`super::observability::IngestionObserver`] is configured, success/failure/alerts are
//!   reported to it.

use std::fmt;
use std::sync::Arc;

use crate::error::{IngestionError, IngestionResult};
use crate::types::TabularDataset;

use super::csv;
use super::observability::{IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats};

/// Extensions accepted by the file chooser and by [`ingest`] (compared case-insensitively).
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["csv", "xlsx", "xls"];

/// Supported ingestion formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionFormat {
    /// Comma-separated values.
    Csv,
    /// Spreadsheet/workbook formats (feature-gated behind `excel`).
    Excel,
}

impl IngestionFormat {
    /// Parse an ingestion format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xls" => Some(Self::Excel),
            _ => None,
        }
    }
}

/// Options controlling unified ingestion behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestionOptions {
    /// Field delimiter for CSV input.
    pub csv_delimiter: u8,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("csv_delimiter", &(self.csv_delimiter as char))
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            csv_delimiter: b',',
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

/// Decode `bytes` as the format named by `extension`.
///
/// Pure transform: the same bytes and extension always yield the same dataset.
///
/// ```
/// use tabular_upload::ingestion::ingest;
/// use tabular_upload::types::Value;
///
/// # fn main() -> Result<(), tabular_upload::IngestionError> {
/// let ds = ingest(b"Name,Age\nAlice,30\n", "CSV")?;
/// assert_eq!(ds.row_count(), 1);
/// assert_eq!(ds.rows()[0].get("Age"), Some(&Value::Utf8("30".to_string())));
/// # Ok(())
/// # }
/// ```
pub fn ingest(bytes: &[u8], extension: &str) -> IngestionResult<TabularDataset> {
    ingest_with_options(bytes, extension, &IngestionOptions::default())
}

/// Like [`ingest`], with explicit options.
///
/// When an observer is configured, this function reports:
///
/// - `on_success` on success, with row/column count stats
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
pub fn ingest_with_options(
    bytes: &[u8],
    extension: &str,
    options: &IngestionOptions,
) -> IngestionResult<TabularDataset> {
    let format = IngestionFormat::from_extension(extension);
    let ctx = IngestionContext {
        extension: extension.to_string(),
        format,
        bytes: bytes.len(),
    };

    let result = match format {
        Some(IngestionFormat::Csv) => csv::ingest_csv_from_bytes(bytes, options.csv_delimiter),
        Some(IngestionFormat::Excel) => ingest_excel_dispatch(bytes, extension),
        None => Err(IngestionError::UnsupportedFormat {
            extension: extension.to_string(),
        }),
    };

    report(&ctx, result.as_ref(), options);
    result
}

pub(crate) fn report(
    ctx: &IngestionContext,
    result: Result<&TabularDataset, &IngestionError>,
    options: &IngestionOptions,
) {
    let Some(obs) = options.observer.as_ref() else {
        return;
    };
    match result {
        Ok(ds) => obs.on_success(
            ctx,
            IngestionStats {
                rows: ds.row_count(),
                columns: ds.first().map(|r| r.len()).unwrap_or(0),
            },
        ),
        Err(e) => {
            let sev = severity_for_error(e);
            obs.on_failure(ctx, sev, e);
            if sev >= options.alert_at_or_above {
                obs.on_alert(ctx, sev, e);
            }
        }
    }
}

pub(crate) fn severity_for_error(e: &IngestionError) -> IngestionSeverity {
    match e {
        IngestionError::UnsupportedFormat { .. } => IngestionSeverity::Warning,
        IngestionError::Io(_) => IngestionSeverity::Critical,
        IngestionError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => IngestionSeverity::Critical,
            _ => IngestionSeverity::Error,
        },
        #[cfg(feature = "excel")]
        IngestionError::Excel(_) => IngestionSeverity::Error,
    }
}

fn ingest_excel_dispatch(bytes: &[u8], extension: &str) -> IngestionResult<TabularDataset> {
    // Avoid unused warnings when the feature is off.
    let _ = (bytes, extension);

    #[cfg(feature = "excel")]
    {
        super::excel::ingest_excel_from_bytes(bytes)
    }

    #[cfg(not(feature = "excel"))]
    {
        Err(IngestionError::UnsupportedFormat {
            extension: extension.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_matching_is_case_insensitive() {
        assert_eq!(IngestionFormat::from_extension("CsV"), Some(IngestionFormat::Csv));
        assert_eq!(IngestionFormat::from_extension("XLS"), Some(IngestionFormat::Excel));
        assert_eq!(IngestionFormat::from_extension("xlsm"), None);
        assert_eq!(IngestionFormat::from_extension(""), None);
    }

    #[test]
    fn severities_rank_unsupported_below_parse_failures() {
        let unsupported = IngestionError::UnsupportedFormat {
            extension: "png".to_string(),
        };
        let io = IngestionError::Io(std::io::Error::other("disk"));
        assert_eq!(severity_for_error(&unsupported), IngestionSeverity::Warning);
        assert_eq!(severity_for_error(&io), IngestionSeverity::Critical);
    }
}
