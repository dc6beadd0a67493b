//! Desktop notifications for supervisor state changes.

use rai_tray_core::{LogNotifier, NotificationSink, Severity};

use notify_rust::Notification;
use tracing::warn;

const NOTIFICATION_TITLE: &str = "RAI";

/// [`NotificationSink`] that logs every message and, when enabled, shows it
/// as a desktop notification.
///
/// Showing a notification can block on the platform notification service,
/// so each one is shown from its own short-lived thread.
#[derive(Debug, Clone, Copy)]
pub struct DesktopNotifier {
    enabled: bool,
}

impl DesktopNotifier {
    /// Create a notifier. With `enabled == false` messages are only logged.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl NotificationSink for DesktopNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        LogNotifier.notify(message, severity);

        if !self.enabled {
            return;
        }

        let body = message.to_string();
        let spawned = std::thread::Builder::new()
            .name("notification".to_string())
            .spawn(move || {
                if let Err(e) = Notification::new()
                    .summary(NOTIFICATION_TITLE)
                    .body(&body)
                    .show()
                {
                    warn!(error = ?e, "Failed to show desktop notification");
                }
            });

        if let Err(e) = spawned {
            warn!(error = ?e, "Failed to spawn notification thread");
        }
    }
}
