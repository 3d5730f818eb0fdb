// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hooks the core calls into the surrounding UI.

use crate::types::Notification;

/// Sink for transient user-facing notifications (toasts).
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Signal that clears a cache the credit dialog reads from.
pub trait CacheReset: Send + Sync {
    fn reset(&self);
}

/// Notifier that routes toasts into the log. Used by the CLI.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            crate::types::NotificationLevel::Error => {
                tracing::error!(message = %notification.message, "notification");
            }
            _ => tracing::info!(message = %notification.message, "notification"),
        }
    }
}

/// Cache reset that does nothing, for hosts without a credit cache.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCacheReset;

impl CacheReset for NoopCacheReset {
    fn reset(&self) {}
}
