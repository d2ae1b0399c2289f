//! The upload workflow: select → preview → submit → done.
//!
//! [`UploadWorkflow`] is the only writer of [`WorkflowState`]. Every event goes through a
//! `&mut self` method, so events are applied one at a time, and every state change goes through
//! a single private transition function.
//!
//! | From | Event | To |
//! |---|---|---|
//! | Idle, PreviewOpen, Submitted, Error | [`select_file`](UploadWorkflow::select_file) | Parsing |
//! | Parsing | [`deliver_bytes`](UploadWorkflow::deliver_bytes) ok | PreviewOpen |
//! | Parsing | [`deliver_bytes`](UploadWorkflow::deliver_bytes) failure | Idle |
//! | PreviewOpen, Error | [`confirm`](UploadWorkflow::confirm) | Submitting |
//! | Submitting | [`settle`](UploadWorkflow::settle) success | Submitted |
//! | Submitting | [`settle`](UploadWorkflow::settle) failure | Error |
//! | any | [`cancel`](UploadWorkflow::cancel) | Idle |
//!
//! Selecting while Parsing or Submitting is rejected with [`WorkflowError::Busy`]. Confirm while
//! Submitting or Submitted does nothing. Cancelling while Submitting aborts the submitter task;
//! its result is never applied.

mod state;
mod task;

use std::fmt;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;

use crate::error::{IngestionError, WorkflowError, WorkflowResult};
use crate::ingestion::unified::report;
use crate::ingestion::{
    ingest_with_options, IngestionContext, IngestionFormat, IngestionOptions, TracingObserver,
};
use crate::notification::{NotificationChannel, NotificationKind, DEFAULT_NOTIFICATION_TTL};
use crate::schema::derive_columns;
use crate::submit::{SubmitOutcome, Submitter};
use crate::types::FileMeta;

pub use state::{Session, WorkflowState};
pub use task::ReadTicket;

use task::SubmitTask;

/// Shown when the selected file is not CSV or Excel.
pub const UNSUPPORTED_FILE_MESSAGE: &str = "Please upload a valid CSV or Excel file.";
/// Shown when the submitter accepts the dataset.
pub const SUBMIT_SUCCESS_MESSAGE: &str = "File sent successfully.";
/// Shown when Confirm is refused for a zero-row dataset.
pub const EMPTY_SUBMISSION_MESSAGE: &str = "There are no rows to submit.";

/// Configuration for an [`UploadWorkflow`].
#[derive(Debug, Clone)]
pub struct WorkflowOptions {
    /// How long notifications stay visible.
    pub notification_ttl: Duration,
    /// Upper bound on a submitter call. `None` waits indefinitely.
    pub submit_timeout: Option<Duration>,
    /// Whether a dataset with zero rows may be submitted.
    pub allow_empty_submission: bool,
    /// Options passed to ingestion. The default reports through [`TracingObserver`].
    pub ingestion: IngestionOptions,
}

impl Default for WorkflowOptions {
    fn default() -> Self {
        Self {
            notification_ttl: DEFAULT_NOTIFICATION_TTL,
            submit_timeout: None,
            allow_empty_submission: true,
            ingestion: IngestionOptions {
                observer: Some(Arc::new(TracingObserver)),
                ..IngestionOptions::default()
            },
        }
    }
}

/// State machine coordinating one upload-preview-submit cycle at a time.
///
/// Submissions run on the Tokio runtime that is current when [`confirm`](Self::confirm) is called.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// use tabular_upload::submit::{SimulatedSubmitter, SubmitOutcome};
/// use tabular_upload::types::FileMeta;
/// use tabular_upload::workflow::{UploadWorkflow, WorkflowState};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), tabular_upload::WorkflowError> {
/// let submitter = SimulatedSubmitter::new(Duration::from_millis(1), SubmitOutcome::Success);
/// let mut wf = UploadWorkflow::new(Arc::new(submitter));
///
/// wf.select_bytes(FileMeta::from_file_name("data.csv"), b"Name,Age\nAlice,30\n")?;
/// assert_eq!(wf.state().preview().map(|p| p.row_count()), Some(1));
///
/// wf.confirm()?;
/// wf.settle().await;
/// assert!(matches!(wf.state(), WorkflowState::Submitted { .. }));
/// assert_eq!(wf.notifications().message(), Some("File sent successfully."));
/// # Ok(())
/// # }
/// ```
pub struct UploadWorkflow {
    state: WorkflowState,
    submitter: Arc<dyn Submitter>,
    notifications: NotificationChannel,
    options: WorkflowOptions,
    submit_task: Option<SubmitTask>,
    next_ticket: u64,
}

impl fmt::Debug for UploadWorkflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadWorkflow")
            .field("state", &self.state.name())
            .field("notification", &self.notifications.message())
            .field("submit_in_flight", &self.submit_task.is_some())
            .field("options", &self.options)
            .finish()
    }
}

impl UploadWorkflow {
    /// Create a workflow with default options.
    pub fn new(submitter: Arc<dyn Submitter>) -> Self {
        Self::with_options(submitter, WorkflowOptions::default())
    }

    /// Create a workflow with explicit options.
    pub fn with_options(submitter: Arc<dyn Submitter>, options: WorkflowOptions) -> Self {
        Self {
            state: WorkflowState::Idle,
            submitter,
            notifications: NotificationChannel::new(options.notification_ttl),
            options,
            submit_task: None,
            next_ticket: 0,
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn options(&self) -> &WorkflowOptions {
        &self.options
    }

    pub fn notifications(&self) -> &NotificationChannel {
        &self.notifications
    }

    /// Mutable access for the notification surface (dismiss, expiry).
    pub fn notifications_mut(&mut self) -> &mut NotificationChannel {
        &mut self.notifications
    }

    /// `true` while a submitter call is outstanding.
    pub fn submit_in_flight(&self) -> bool {
        self.submit_task.is_some()
    }

    /// The user picked a file. Enters Parsing and returns the ticket its bytes must carry.
    ///
    /// Any open preview is discarded. Unsupported extensions are rejected here, before any read:
    /// the workflow returns to Idle with [`UNSUPPORTED_FILE_MESSAGE`].
    pub fn select_file(&mut self, meta: FileMeta) -> WorkflowResult<ReadTicket> {
        if self.state.is_busy() {
            tracing::warn!(state = self.state.name(), file = %meta.original_name, "selection rejected");
            return Err(WorkflowError::Busy {
                state: self.state.name(),
            });
        }

        let format = IngestionFormat::from_extension(&meta.extension);
        if format.is_none() {
            let err = IngestionError::UnsupportedFormat {
                extension: meta.extension.clone(),
            };
            report(&self.ingestion_context(&meta), Err(&err), &self.options.ingestion);
            self.notifications
                .post_kind(UNSUPPORTED_FILE_MESSAGE, NotificationKind::Error);
            self.transition(WorkflowState::Idle);
            return Err(err.into());
        }

        self.next_ticket += 1;
        let ticket = ReadTicket::new(self.next_ticket);
        tracing::debug!(file = %meta.original_name, ?format, "file selected");
        self.transition(WorkflowState::Parsing { meta, ticket });
        Ok(ticket)
    }

    /// The read for `ticket` finished. Decodes the bytes and opens the preview, or returns to Idle
    /// with a notification on failure.
    ///
    /// A ticket that does not match the current selection is discarded with
    /// [`WorkflowError::StaleRead`] and changes nothing.
    pub fn deliver_bytes(&mut self, ticket: ReadTicket, read: io::Result<Vec<u8>>) -> WorkflowResult<()> {
        match read {
            Ok(bytes) => self.finish_read(ticket, Ok(&bytes)),
            Err(err) => self.finish_read(ticket, Err(err)),
        }
    }

    /// Select a file whose bytes are already in memory.
    pub fn select_bytes(&mut self, meta: FileMeta, bytes: &[u8]) -> WorkflowResult<()> {
        let ticket = self.select_file(meta)?;
        self.finish_read(ticket, Ok(bytes))
    }

    /// Select a file on disk and read it asynchronously.
    pub async fn select_path(&mut self, path: impl AsRef<Path>) -> WorkflowResult<()> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let ticket = self.select_file(FileMeta::from_file_name(name))?;
        let read = tokio::fs::read(path).await;
        self.deliver_bytes(ticket, read)
    }

    /// The user confirmed the preview. Starts the submitter call.
    ///
    /// Returns `Ok(true)` if a submission was started. In Error this retries with the retained
    /// dataset. In every other state except PreviewOpen it does nothing and returns `Ok(false)`.
    /// Outside a Tokio runtime it fails with [`WorkflowError::NoRuntime`] and changes nothing.
    pub fn confirm(&mut self) -> WorkflowResult<bool> {
        let session = match &self.state {
            WorkflowState::PreviewOpen(session) | WorkflowState::Error { session, .. } => session.clone(),
            other => {
                tracing::debug!(state = other.name(), "confirm ignored");
                return Ok(false);
            }
        };

        if session.dataset.is_empty() && !self.options.allow_empty_submission {
            self.notifications
                .post_kind(EMPTY_SUBMISSION_MESSAGE, NotificationKind::Error);
            return Err(WorkflowError::EmptySubmission);
        }

        let runtime = Handle::try_current().map_err(|err| {
            tracing::warn!(error = %err, "confirm outside a tokio runtime");
            WorkflowError::NoRuntime
        })?;

        debug_assert!(self.submit_task.is_none(), "submission already in flight");
        tracing::info!(
            file = %session.meta.original_name,
            rows = session.dataset.row_count(),
            columns = session.columns.len(),
            "submitting"
        );
        self.submit_task = Some(SubmitTask::spawn(
            &runtime,
            Arc::clone(&self.submitter),
            session.submission(),
            self.options.submit_timeout,
        ));
        self.transition(WorkflowState::Submitting(session));
        Ok(true)
    }

    /// Wait for the in-flight submission and apply its outcome.
    ///
    /// Returns `None` when nothing is in flight. Cancel-safe: if this future is dropped before
    /// completion, the submission stays in flight and a later call picks it up.
    pub async fn settle(&mut self) -> Option<SubmitOutcome> {
        let outcome = self.submit_task.as_mut()?.join().await;
        self.submit_task = None;
        self.apply_outcome(outcome.clone());
        Some(outcome)
    }

    /// Apply the submission outcome if it is already available (or timed out); never waits.
    pub fn try_settle(&mut self) -> Option<SubmitOutcome> {
        let outcome = self.submit_task.as_mut()?.try_join()?;
        self.submit_task = None;
        self.apply_outcome(outcome.clone());
        Some(outcome)
    }

    /// The user closed the preview (or abandoned the selection). Returns to Idle.
    ///
    /// While Submitting, the submitter task is aborted; its result is never applied.
    pub fn cancel(&mut self) {
        if self.state.is_idle() {
            return;
        }
        if let Some(task) = self.submit_task.take() {
            task.abort();
            tracing::info!("submission aborted by cancel");
        }
        self.transition(WorkflowState::Idle);
    }

    fn finish_read(&mut self, ticket: ReadTicket, read: Result<&[u8], io::Error>) -> WorkflowResult<()> {
        let meta = match &self.state {
            WorkflowState::Parsing { meta, ticket: current } if *current == ticket => meta.clone(),
            other => {
                tracing::debug!(state = other.name(), ?ticket, "discarding stale read");
                return Err(WorkflowError::StaleRead);
            }
        };

        let result = match read {
            Ok(bytes) => ingest_with_options(bytes, &meta.extension, &self.options.ingestion),
            Err(err) => {
                let err = IngestionError::Io(err);
                report(&self.ingestion_context(&meta), Err(&err), &self.options.ingestion);
                Err(err)
            }
        };

        match result {
            Ok(dataset) => {
                let columns = derive_columns(&dataset);
                tracing::debug!(
                    file = %meta.original_name,
                    rows = dataset.row_count(),
                    columns = columns.len(),
                    "preview ready"
                );
                self.transition(WorkflowState::PreviewOpen(Session {
                    meta,
                    dataset: Arc::new(dataset),
                    columns: Arc::from(columns),
                }));
                Ok(())
            }
            Err(err) => {
                tracing::warn!(file = %meta.original_name, error = %err, "could not ingest file");
                self.notifications.post_kind(
                    format!("Could not read \"{}\": {err}", meta.original_name),
                    NotificationKind::Error,
                );
                self.transition(WorkflowState::Idle);
                Err(err.into())
            }
        }
    }

    fn apply_outcome(&mut self, outcome: SubmitOutcome) {
        let session = match &self.state {
            WorkflowState::Submitting(session) => session.clone(),
            other => {
                tracing::debug!(state = other.name(), %outcome, "discarding stale submission outcome");
                return;
            }
        };

        match outcome {
            SubmitOutcome::Success => {
                tracing::info!(file = %session.meta.original_name, "submission accepted");
                self.notifications
                    .post_kind(SUBMIT_SUCCESS_MESSAGE, NotificationKind::Success);
                self.transition(WorkflowState::Submitted {
                    rows: session.dataset.row_count(),
                    meta: session.meta,
                });
            }
            SubmitOutcome::Failure(reason) => {
                tracing::warn!(file = %session.meta.original_name, %reason, "submission failed");
                self.notifications.post_kind(
                    format!("Failed to send file: {reason}"),
                    NotificationKind::Error,
                );
                self.transition(WorkflowState::Error {
                    session,
                    message: reason,
                });
            }
        }
    }

    fn ingestion_context(&self, meta: &FileMeta) -> IngestionContext {
        IngestionContext {
            extension: meta.extension.clone(),
            format: IngestionFormat::from_extension(&meta.extension),
            bytes: 0,
        }
    }

    fn transition(&mut self, next: WorkflowState) {
        tracing::debug!(from = self.state.name(), to = next.name(), "workflow transition");
        self.state = next;
    }
}

impl Drop for UploadWorkflow {
    fn drop(&mut self) {
        if let Some(task) = self.submit_task.take() {
            task.abort();
        }
    }
}
