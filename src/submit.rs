//! The submission collaborator contract.
//!
//! A [`Submitter`] receives a confirmed [`Submission`] and reports a [`SubmitOutcome`]. The
//! workflow runs it as a spawned task, so implementations must be `Send + Sync + 'static`.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::types::{ColumnDef, FileMeta, TabularDataset};

/// Delay used by [`SimulatedSubmitter::default`].
pub const SIMULATED_SUBMIT_DELAY: Duration = Duration::from_millis(2_000);

/// A confirmed dataset handed to a [`Submitter`].
#[derive(Debug, Clone)]
pub struct Submission {
    pub meta: FileMeta,
    pub dataset: Arc<TabularDataset>,
    pub columns: Arc<[ColumnDef]>,
}

/// Result reported by a [`Submitter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Success,
    Failure(String),
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Success)
    }
}

impl fmt::Display for SubmitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitOutcome::Success => f.write_str("success"),
            SubmitOutcome::Failure(reason) => write!(f, "failure: {reason}"),
        }
    }
}

/// Accepts confirmed datasets. Failures are reported, never panicked.
#[async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(&self, submission: Submission) -> SubmitOutcome;
}

/// Stand-in submitter: waits a fixed delay, then reports a fixed outcome.
///
/// The default waits [`SIMULATED_SUBMIT_DELAY`] and always succeeds.
#[derive(Debug, Clone)]
pub struct SimulatedSubmitter {
    delay: Duration,
    outcome: SubmitOutcome,
}

impl Default for SimulatedSubmitter {
    fn default() -> Self {
        Self::new(SIMULATED_SUBMIT_DELAY, SubmitOutcome::Success)
    }
}

impl SimulatedSubmitter {
    pub fn new(delay: Duration, outcome: SubmitOutcome) -> Self {
        Self { delay, outcome }
    }

    /// A submitter that fails with `reason` after `delay`.
    pub fn failing(delay: Duration, reason: impl Into<String>) -> Self {
        Self::new(delay, SubmitOutcome::Failure(reason.into()))
    }
}

#[async_trait]
impl Submitter for SimulatedSubmitter {
    async fn submit(&self, submission: Submission) -> SubmitOutcome {
        tracing::debug!(
            file = %submission.meta.original_name,
            rows = submission.dataset.row_count(),
            delay_ms = self.delay.as_millis() as u64,
            "simulated submit"
        );
        tokio::time::sleep(self.delay).await;
        self.outcome.clone()
    }
}
