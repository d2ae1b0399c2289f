//! Hooks for watching what happens to uploaded files.
//!
//! Every call to [`super::ingest_with_options`], and every file the workflow refuses before
//! reading, is reported to the configured [`IngestionObserver`]: `on_success` with the shape of the
//! decoded table, `on_failure` with a [`IngestionSeverity`], and additionally `on_alert` once the
//! severity reaches `IngestionOptions::alert_at_or_above`.

use std::fmt;
use std::sync::Arc;

use crate::error::IngestionError;

use super::unified::IngestionFormat;

/// How bad a failed upload is. Ordered, so thresholds compare with `>=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IngestionSeverity {
    Info,
    /// The user picked a file type we do not read.
    Warning,
    /// The bytes did not decode as CSV or as a workbook.
    Error,
    /// The file could not be read at all.
    Critical,
}

/// What was being ingested when an event fired.
#[derive(Debug, Clone)]
pub struct IngestionContext {
    /// Extension as it came from the file name (not lowercased).
    pub extension: String,
    /// `None` for extensions outside the allow-list.
    pub format: Option<IngestionFormat>,
    /// Buffer length; 0 when the file was rejected or its read failed.
    pub bytes: usize,
}

/// Shape of a successfully decoded upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionStats {
    /// Data rows, header excluded.
    pub rows: usize,
    /// Cells in the first data row (0 for a header-only file).
    pub columns: usize,
}

/// Receives upload outcomes. All methods default to doing nothing.
pub trait IngestionObserver: Send + Sync {
    fn on_success(&self, _ctx: &IngestionContext, _stats: IngestionStats) {}

    fn on_failure(&self, _ctx: &IngestionContext, _severity: IngestionSeverity, _error: &IngestionError) {}

    /// Fired after `on_failure` when the severity is at or above the configured threshold.
    fn on_alert(&self, _ctx: &IngestionContext, _severity: IngestionSeverity, _error: &IngestionError) {}
}

/// Forwards every event to each wrapped observer, in insertion order.
#[derive(Default, Clone)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn IngestionObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn IngestionObserver>>) -> Self {
        Self { observers }
    }

    /// Builder-style append.
    pub fn with(mut self, observer: Arc<dyn IngestionObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl FromIterator<Arc<dyn IngestionObserver>> for CompositeObserver {
    fn from_iter<I: IntoIterator<Item = Arc<dyn IngestionObserver>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CompositeObserver").field(&self.observers.len()).finish()
    }
}

impl IngestionObserver for CompositeObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        self.observers.iter().for_each(|o| o.on_success(ctx, stats));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.observers.iter().for_each(|o| o.on_failure(ctx, severity, error));
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.observers.iter().for_each(|o| o.on_alert(ctx, severity, error));
    }
}

/// Emits ingestion events as `tracing` events under the `tabular_upload::ingest` target.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl IngestionObserver for TracingObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        tracing::info!(
            target: "tabular_upload::ingest",
            extension = %ctx.extension,
            format = ?ctx.format,
            bytes = ctx.bytes,
            rows = stats.rows,
            columns = stats.columns,
            "ingested file"
        );
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        tracing::warn!(
            target: "tabular_upload::ingest",
            extension = %ctx.extension,
            format = ?ctx.format,
            bytes = ctx.bytes,
            ?severity,
            %error,
            "ingestion failed"
        );
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        tracing::error!(
            target: "tabular_upload::ingest",
            extension = %ctx.extension,
            format = ?ctx.format,
            ?severity,
            %error,
            "ingestion alert"
        );
    }
}
