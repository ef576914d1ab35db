//! Notification sink abstract Trait

use crate::types::{Notification, NotificationKind};

/// Notification sink Trait
///
/// Fire-and-forget: flows never inspect a result.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Notifier that writes to the log
///
/// Useful for headless embedders; UI frontends provide a toast-backed sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => log::info!("{}", notification.message()),
            NotificationKind::Error => log::warn!("{}", notification.message()),
        }
    }
}
