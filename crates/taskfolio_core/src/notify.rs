//! User-facing notifications emitted by session and task operations.
//!
//! Every completed operation (success or failure) produces exactly one
//! `Notification`. Rendering is the caller's job; the core only hands them
//! to a `NotificationSink`.

use log::{info, warn};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub detail: Option<String>,
}

impl Notification {
    pub fn success(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            title: title.into(),
            detail: Some(detail.into()),
        }
    }

    pub fn error(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: title.into(),
            detail: Some(detail.into()),
        }
    }

    /// Success notification with a title only.
    pub fn success_title(title: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            title: title.into(),
            detail: None,
        }
    }
}

/// Receiver for notifications.
pub trait NotificationSink {
    fn notify(&self, notification: Notification);
}

impl<N: NotificationSink + ?Sized> NotificationSink for Arc<N> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification);
    }
}

impl<N: NotificationSink + ?Sized> NotificationSink for &N {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification);
    }
}

/// Collects notifications in memory. Clones share one buffer.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    entries: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far, oldest first.
    pub fn snapshot(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<Notification> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.last().cloned())
    }

    /// Drains the buffer.
    pub fn take(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .map(|mut entries| std::mem::take(&mut *entries))
            .unwrap_or_default()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notification: Notification) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(notification);
        }
    }
}

/// Forwards notification titles to the log.
///
/// Details are dropped because they can carry task titles and user names.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => {
                info!("event=notify module=ui status=ok title={}", notification.title)
            }
            NotificationLevel::Error => {
                warn!(
                    "event=notify module=ui status=error title={}",
                    notification.title
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_keeps_order_and_drains() {
        let sink = RecordingSink::new();
        sink.notify(Notification::success("a", "first"));
        sink.notify(Notification::error("b", "second"));

        assert_eq!(sink.last().map(|n| n.title), Some("b".to_string()));
        let drained = sink.take();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].level, NotificationLevel::Success);
        assert!(sink.snapshot().is_empty());
    }

    #[test]
    fn log_sink_is_usable_behind_shared_handles() {
        let sink = Arc::new(LogSink);
        sink.notify(Notification::success_title("Logged out successfully"));
        sink.notify(Notification::error("Login failed", "Invalid email or password"));
    }
}
