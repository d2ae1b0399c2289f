use std::sync::Arc;

use crate::preview::Preview;
use crate::submit::Submission;
use crate::types::{ColumnDef, FileMeta, TabularDataset};

use super::task::ReadTicket;

/// A parsed file awaiting (or undergoing) submission.
#[derive(Debug, Clone)]
pub struct Session {
    pub meta: FileMeta,
    pub dataset: Arc<TabularDataset>,
    pub columns: Arc<[ColumnDef]>,
}

impl Session {
    /// Paged view for the preview grid.
    pub fn preview(&self) -> Preview<'_> {
        Preview::new(&self.dataset, &self.columns)
    }

    pub(super) fn submission(&self) -> Submission {
        Submission {
            meta: self.meta.clone(),
            dataset: Arc::clone(&self.dataset),
            columns: Arc::clone(&self.columns),
        }
    }
}

/// Where the upload workflow currently is. Each variant carries only what is valid in it.
#[derive(Debug, Clone)]
pub enum WorkflowState {
    /// Nothing selected.
    Idle,
    /// A file was selected and its bytes are being read and decoded.
    Parsing { meta: FileMeta, ticket: ReadTicket },
    /// The dataset is shown for confirmation.
    PreviewOpen(Session),
    /// The submitter is working on the confirmed dataset.
    Submitting(Session),
    /// The submitter accepted the dataset; the preview is closed.
    Submitted { meta: FileMeta, rows: usize },
    /// The submitter rejected the dataset. It is kept so Confirm can retry.
    Error { session: Session, message: String },
}

impl WorkflowState {
    /// Short state name for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowState::Idle => "idle",
            WorkflowState::Parsing { .. } => "parsing",
            WorkflowState::PreviewOpen(_) => "preview_open",
            WorkflowState::Submitting(_) => "submitting",
            WorkflowState::Submitted { .. } => "submitted",
            WorkflowState::Error { .. } => "error",
        }
    }

    /// `true` while a read or a submission is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self, WorkflowState::Parsing { .. } | WorkflowState::Submitting(_))
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, WorkflowState::Idle)
    }

    /// The parsed file, from PreviewOpen through Error.
    pub fn session(&self) -> Option<&Session> {
        match self {
            WorkflowState::PreviewOpen(s) | WorkflowState::Submitting(s) => Some(s),
            WorkflowState::Error { session, .. } => Some(session),
            _ => None,
        }
    }

    /// Whether a preview dialog should be showing.
    pub fn is_preview_open(&self) -> bool {
        self.session().is_some()
    }

    /// What the preview grid renders, while the preview is open.
    pub fn preview(&self) -> Option<Preview<'_>> {
        self.session().map(Session::preview)
    }

    /// Submitter failure reason, only in [`WorkflowState::Error`].
    pub fn error_message(&self) -> Option<&str> {
        match self {
            WorkflowState::Error { message, .. } => Some(message),
            _ => None,
        }
    }
}
