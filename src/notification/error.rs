//! Notification system error types.

use thiserror::Error;

/// Errors that can occur when delivering a notification.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// No notification facility could be reached.
    #[error("notification facility unavailable: {0}")]
    Unavailable(String),

    /// Notification permission was denied by the user.
    #[error("notification permission denied")]
    PermissionDenied,
}

impl NotificationError {
    /// Returns true if this error is related to permissions.
    #[must_use]
    pub fn is_permission_error(&self) -> bool {
        matches!(self, Self::PermissionDenied)
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "check that a desktop notification daemon is running",
            Self::PermissionDenied => "allow notifications for this application in system settings",
        }
    }
}
