//! Notifications Module
//!
//! Latest-value broadcast of successful store mutations. Subscribers see the
//! most recent notification only; nothing older is replayed.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

// == Notification Kind ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Created,
    Updated,
    Deleted,
}

// == Notification ==
/// A committed mutation. `data` is `None` for deletions.
#[derive(Debug, Clone, Serialize)]
pub struct Notification<E> {
    pub kind: NotificationKind,
    pub entity_id: i64,
    pub data: Option<E>,
    pub created_at: DateTime<Utc>,
}

impl<E> Notification<E> {
    pub fn created(entity_id: i64, data: E) -> Self {
        Self::new(NotificationKind::Created, entity_id, Some(data))
    }

    pub fn updated(entity_id: i64, data: E) -> Self {
        Self::new(NotificationKind::Updated, entity_id, Some(data))
    }

    pub fn deleted(entity_id: i64) -> Self {
        Self::new(NotificationKind::Deleted, entity_id, None)
    }

    fn new(kind: NotificationKind, entity_id: i64, data: Option<E>) -> Self {
        Self {
            kind,
            entity_id,
            data,
            created_at: Utc::now(),
        }
    }
}

// == Notifier ==
/// Publishing side of the notification channel.
#[derive(Debug)]
pub struct Notifier<E> {
    sender: watch::Sender<Option<Notification<E>>>,
}

impl<E> Default for Notifier<E> {
    fn default() -> Self {
        let (sender, _) = watch::channel(None);
        Self { sender }
    }
}

impl<E> Notifier<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the latest notification. Never fails, with or without subscribers.
    pub fn publish(&self, notification: Notification<E>) {
        debug!(
            kind = ?notification.kind,
            entity_id = notification.entity_id,
            subscribers = self.sender.receiver_count(),
            "Publishing notification"
        );
        self.sender.send_replace(Some(notification));
    }

    /// Subscribes to future notifications.
    ///
    /// The receiver starts at the current value; call `changed().await` to
    /// wait for the next one.
    pub fn subscribe(&self) -> watch::Receiver<Option<Notification<E>>> {
        self.sender.subscribe()
    }
}
