//! Desktop notifications via `notify-rust`.

use notify_rust::Notification;

use super::{NotificationError, Notifier, PermissionState};

/// Default notification summary line.
const DEFAULT_SUMMARY: &str = "duotimer";

/// Notifier backed by the desktop notification daemon.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    summary: String,
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl DesktopNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self {
            summary: DEFAULT_SUMMARY.to_string(),
        }
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }
}

impl Notifier for DesktopNotifier {
    // Desktop daemons show notifications without an interactive prompt.
    fn request_permission(&self) -> PermissionState {
        PermissionState::Granted
    }

    fn notify(&self, message: &str) -> Result<(), NotificationError> {
        Notification::new()
            .summary(&self.summary)
            .body(message)
            .show()
            .map(|_| ())
            .map_err(|e| NotificationError::Unavailable(e.to_string()))
    }
}
