//! Single-slot, self-expiring user notifications.
//!
//! A [`NotificationChannel`] holds at most one [`Notification`]. Posting replaces whatever is
//! there; the message disappears on [`NotificationChannel::dismiss`] or once its time-to-live
//! has elapsed, whichever comes first. Expiry is evaluated against [`tokio::time::Instant`], so
//! paused-clock tests observe it exactly.

use std::time::Duration;

use tokio::time::Instant;

/// Default time a notification stays visible.
pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_millis(3_000);

/// Tone of a notification, for surfaces that style messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

/// A message shown to the user until `expires_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub expires_at: Instant,
}

/// Single-slot mailbox for transient user feedback.
#[derive(Debug)]
pub struct NotificationChannel {
    slot: Option<Notification>,
    ttl: Duration,
}

impl Default for NotificationChannel {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_TTL)
    }
}

impl NotificationChannel {
    /// Create a channel whose messages auto-clear after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self { slot: None, ttl }
    }

    /// Configured time-to-live for posted messages.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Post an informational message, replacing any unseen one.
    pub fn post(&mut self, message: impl Into<String>) {
        self.post_kind(message, NotificationKind::Info);
    }

    /// Post a message with an explicit kind, replacing any unseen one.
    pub fn post_kind(&mut self, message: impl Into<String>, kind: NotificationKind) {
        let message = message.into();
        if let Some(prev) = self.live() {
            tracing::debug!(replaced = %prev.message, "notification overwritten");
        }
        self.slot = Some(Notification {
            message,
            kind,
            expires_at: Instant::now() + self.ttl,
        });
    }

    /// Clear the current message, if any.
    pub fn dismiss(&mut self) {
        self.slot = None;
    }

    /// The live message, or `None` once dismissed or expired.
    pub fn current(&self) -> Option<&Notification> {
        self.live()
    }

    /// Text of the live message.
    pub fn message(&self) -> Option<&str> {
        self.live().map(|n| n.message.as_str())
    }

    /// Drop the slot if its message has expired. Returns `true` if something was cleared.
    pub fn purge_expired(&mut self) -> bool {
        let expired = self
            .slot
            .as_ref()
            .is_some_and(|n| Instant::now() >= n.expires_at);
        if expired {
            self.slot = None;
        }
        expired
    }

    /// Wait until the live message expires, then clear it.
    ///
    /// Returns immediately when nothing is live. A message posted while waiting is not waited on.
    pub async fn expired(&mut self) {
        if let Some(deadline) = self.live().map(|n| n.expires_at) {
            tokio::time::sleep_until(deadline).await;
            self.purge_expired();
        }
    }

    fn live(&self) -> Option<&Notification> {
        self.slot
            .as_ref()
            .filter(|n| Instant::now() < n.expires_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn message_visible_until_exact_ttl() {
        let mut ch = NotificationChannel::default();
        ch.post("hello");
        assert_eq!(ch.message(), Some("hello"));

        tokio::time::advance(Duration::from_millis(2_999)).await;
        assert_eq!(ch.message(), Some("hello"));

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(ch.message(), None);
        assert!(ch.purge_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn second_post_replaces_and_restarts_ttl() {
        let mut ch = NotificationChannel::new(Duration::from_millis(100));
        ch.post("first");
        tokio::time::advance(Duration::from_millis(60)).await;
        ch.post_kind("second", NotificationKind::Error);

        let n = ch.current().unwrap();
        assert_eq!(n.message, "second");
        assert_eq!(n.kind, NotificationKind::Error);

        tokio::time::advance(Duration::from_millis(60)).await;
        assert_eq!(ch.message(), Some("second"));
    }

    #[tokio::test(start_paused = true)]
    async fn dismiss_clears_immediately() {
        let mut ch = NotificationChannel::default();
        ch.post("bye");
        ch.dismiss();
        assert!(ch.current().is_none());
        ch.expired().await;
    }

    #[tokio::test(start_paused = true)]
    async fn expired_waits_for_deadline() {
        let mut ch = NotificationChannel::default();
        ch.post("wait");
        let start = Instant::now();
        ch.expired().await;
        assert!(start.elapsed() >= DEFAULT_NOTIFICATION_TTL);
        assert!(ch.current().is_none());
    }
}
