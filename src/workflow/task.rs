use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::Instant;

use crate::submit::{Submission, SubmitOutcome, Submitter};

/// Identifies one file selection. Bytes delivered with an older ticket are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReadTicket(u64);

impl ReadTicket {
    pub(super) fn new(seq: u64) -> Self {
        Self(seq)
    }
}

/// The single in-flight submitter call owned by a workflow.
pub(super) struct SubmitTask {
    handle: JoinHandle<SubmitOutcome>,
    timeout: Option<Duration>,
    deadline: Option<Instant>,
}

impl SubmitTask {
    /// Spawn `submitter.submit(submission)` onto `runtime`.
    pub(super) fn spawn(
        runtime: &Handle,
        submitter: Arc<dyn Submitter>,
        submission: Submission,
        timeout: Option<Duration>,
    ) -> Self {
        let handle = runtime.spawn(async move { submitter.submit(submission).await });
        Self {
            handle,
            timeout,
            deadline: timeout.map(|t| Instant::now() + t),
        }
    }

    /// Wait for the outcome, enforcing the deadline.
    ///
    /// Cancel-safe: dropping this future leaves the task running and joinable.
    pub(super) async fn join(&mut self) -> SubmitOutcome {
        let joined = match self.deadline {
            Some(deadline) => match tokio::time::timeout_at(deadline, &mut self.handle).await {
                Ok(joined) => joined,
                Err(_) => {
                    self.handle.abort();
                    return self.timed_out();
                }
            },
            None => (&mut self.handle).await,
        };
        outcome_from_join(joined)
    }

    /// The outcome if the task already finished or its deadline passed; never waits.
    pub(super) fn try_join(&mut self) -> Option<SubmitOutcome> {
        if self.handle.is_finished() {
            let mut cx = Context::from_waker(Waker::noop());
            if let Poll::Ready(joined) = Pin::new(&mut self.handle).poll(&mut cx) {
                return Some(outcome_from_join(joined));
            }
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            self.handle.abort();
            return Some(self.timed_out());
        }
        None
    }

    pub(super) fn abort(&self) {
        self.handle.abort();
    }

    fn timed_out(&self) -> SubmitOutcome {
        let ms = self.timeout.unwrap_or_default().as_millis();
        SubmitOutcome::Failure(format!("submission timed out after {ms} ms"))
    }
}

fn outcome_from_join(joined: Result<SubmitOutcome, JoinError>) -> SubmitOutcome {
    match joined {
        Ok(outcome) => outcome,
        Err(err) if err.is_cancelled() => SubmitOutcome::Failure("submission was cancelled".to_string()),
        Err(err) => SubmitOutcome::Failure(format!("submitter panicked: {err}")),
    }
}
