//! Error notifications.
//!
//! Failing pipelines never propagate their error to subscribers; they push a
//! message here and continue with a fallback value. Each screen opens its own
//! session on the notifier to show an error banner next to whatever data is
//! still flowing; a notification lives only as long as the sessions that saw it.

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

use crate::bus::Publish;

const NOTIFICATION_CAPACITY: usize = 64;

/// A message destined for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNotification {
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl ErrorNotification {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            raised_at: Utc::now(),
        }
    }
}

/// Fan-out channel for error notifications.
///
/// Each [`Notifier::subscribe`] call opens a session that receives every
/// notification pushed after it was opened, exactly once. Nothing is replayed:
/// a session opened after a failure does not see it.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<ErrorNotification>,
}

impl Default for Notifier {
    fn default() -> Self {
        let (tx, _rx) = broadcast::channel(NOTIFICATION_CAPACITY);
        Self { tx }
    }
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&self, message: impl Into<String>) {
        // No open session: nobody is displaying errors, drop it.
        let _ = self.tx.send(ErrorNotification::new(message));
    }

    /// Open a notification session.
    pub fn subscribe(&self) -> NotificationStream {
        NotificationStream {
            rx: self.tx.subscribe(),
        }
    }
}

impl Publish<String> for Notifier {
    fn publish(&self, message: String) {
        self.notify(message)
    }
}

/// One subscriber session on a [`Notifier`].
#[derive(Debug)]
pub struct NotificationStream {
    rx: broadcast::Receiver<ErrorNotification>,
}

impl NotificationStream {
    /// Wait for the next notification; `None` once the notifier is gone.
    pub async fn recv(&mut self) -> Option<ErrorNotification> {
        loop {
            match self.rx.recv().await {
                Ok(notification) => return Some(notification),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("notification session lagged, skipped {} messages", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Take a pending notification without waiting.
    pub fn try_recv(&mut self) -> Option<ErrorNotification> {
        loop {
            match self.rx.try_recv() {
                Ok(notification) => return Some(notification),
                Err(TryRecvError::Lagged(_)) => continue,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }
}
