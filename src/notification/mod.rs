//! Completion notifications.
//!
//! The timer never talks to a notification facility directly. It holds a
//! [`Notifier`] capability, asks it for permission when the user opts in,
//! and requests a message when a channel completes:
//!
//! - [`DesktopNotifier`] delivers through the desktop notification daemon
//! - [`MockNotifier`] records messages for tests
//!
//! Delivery failures are reported as [`NotificationError`] and never stop
//! the timer from completing.

mod desktop;
pub mod error;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

pub use self::desktop::DesktopNotifier;
pub use self::error::NotificationError;

use crate::types::Channel;

/// Message sent the first time permission is granted.
pub const ENABLED_MESSAGE: &str = "Notifications enabled successfully!";

/// Message sent when the user opts in again after permission was granted.
pub const ALREADY_ENABLED_MESSAGE: &str = "Notifications are already enabled.";

/// Returns the completion message for a channel, e.g. `"breakTime is completed"`.
#[must_use]
pub fn completion_message(channel: Channel) -> String {
    format!("{} is completed", channel.as_str())
}

// ============================================================================
// PermissionState
// ============================================================================

/// Notification permission as reported by the facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    /// Notifications may be shown
    Granted,
    /// The user refused notifications
    Denied,
    /// Not asked yet
    #[default]
    Default,
}

impl PermissionState {
    /// Returns the string representation of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionState::Granted => "granted",
            PermissionState::Denied => "denied",
            PermissionState::Default => "default",
        }
    }

    /// Returns true if notifications may be shown.
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionState::Granted)
    }
}

// ============================================================================
// Notifier
// ============================================================================

/// Capability for showing notifications.
pub trait Notifier {
    /// Asks the facility for permission to show notifications.
    fn request_permission(&self) -> PermissionState;

    /// Shows a notification carrying `message`.
    ///
    /// # Errors
    ///
    /// Returns an error if the facility is absent or refuses the request.
    fn notify(&self, message: &str) -> Result<(), NotificationError>;
}

/// Mock notifier for testing.
#[derive(Debug)]
pub struct MockNotifier {
    messages: Mutex<Vec<String>>,
    permission: Mutex<PermissionState>,
    permission_requests: Mutex<usize>,
    should_fail: AtomicBool,
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNotifier {
    /// Creates a mock that grants permission when asked.
    #[must_use]
    pub fn new() -> Self {
        Self::with_permission(PermissionState::Granted)
    }

    /// Creates a mock that answers permission requests with `permission`.
    #[must_use]
    pub fn with_permission(permission: PermissionState) -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            permission: Mutex::new(permission),
            permission_requests: Mutex::new(0),
            should_fail: AtomicBool::new(false),
        }
    }

    /// Changes the permission reported from now on. `Denied` also makes
    /// [`Notifier::notify`] refuse.
    pub fn set_permission(&self, permission: PermissionState) {
        *self.permission.lock().unwrap_or_else(PoisonError::into_inner) = permission;
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    /// Returns every message delivered so far.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn notification_count(&self) -> usize {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns how many times permission was requested.
    #[must_use]
    pub fn permission_requests(&self) -> usize {
        *self
            .permission_requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn clear_recorded(&self) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Notifier for MockNotifier {
    fn request_permission(&self) -> PermissionState {
        *self
            .permission_requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner) += 1;
        *self.permission.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, message: &str) -> Result<(), NotificationError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(NotificationError::Unavailable("mock failure".to_string()));
        }
        if *self.permission.lock().unwrap_or_else(PoisonError::into_inner)
            == PermissionState::Denied
        {
            return Err(NotificationError::PermissionDenied);
        }
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
        Ok(())
    }
}
