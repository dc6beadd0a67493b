use tracing::{error, info, warn};

/// How prominent a notification should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Routine state change.
    Info,
    /// Something the user may want to look at.
    Warning,
    /// A launch could not happen.
    Error,
}

/// One-way channel for human-visible state changes.
///
/// Implementations must return promptly and must not panic.
pub trait NotificationSink {
    /// Present `message` to the user.
    fn notify(&self, message: &str, severity: Severity);
}

/// Sink that only writes to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Info => info!(message, "Notification"),
            Severity::Warning => warn!(message, "Notification"),
            Severity::Error => error!(message, "Notification"),
        }
    }
}
