//! Persistence of the timer record.
//!
//! The store keeps one named record holding both channels' remaining and
//! default durations, plus the notification permission the user answered:
//!
//! ```json
//! { "interval": 3600, "breakTime": 1500, "defaultInterval": 3600, "defaultBreakTime": 1500, "permission": "granted" }
//! ```
//!
//! Loading is lenient: each missing, zero-default or ill-typed field falls
//! back to its hard-coded default on its own, and an unparsable document
//! falls back entirely, instead of failing.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::notification::PermissionState;
use crate::types::{Channel, ChannelState, Channels};

// ============================================================================
// StorageError
// ============================================================================

/// Errors raised by a [`Storage`] backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The snapshot could not be serialized.
    #[error("failed to serialize timer record: {0}")]
    Serialize(#[from] serde_json::Error),
}

// ============================================================================
// TimerSnapshot
// ============================================================================

/// Serialized form of both channels and the notification permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub interval: u32,
    pub break_time: u32,
    pub default_interval: u32,
    pub default_break_time: u32,
    #[serde(default)]
    pub permission: PermissionState,
}

impl Default for TimerSnapshot {
    fn default() -> Self {
        Self::from_channels(&Channels::default(), PermissionState::Default)
    }
}

impl TimerSnapshot {
    /// Captures the current durations of both channels.
    pub fn from_channels(channels: &Channels, permission: PermissionState) -> Self {
        Self {
            interval: channels[Channel::Interval].remaining_seconds,
            break_time: channels[Channel::BreakTime].remaining_seconds,
            default_interval: channels[Channel::Interval].default_seconds,
            default_break_time: channels[Channel::BreakTime].default_seconds,
            permission,
        }
    }

    /// Rebuilds idle channels from the snapshot.
    pub fn to_channels(&self) -> Channels {
        Channels::new(
            ChannelState::new(self.interval, self.default_interval),
            ChannelState::new(self.break_time, self.default_break_time),
        )
    }

    /// Resolves a stored payload, substituting defaults for anything missing.
    ///
    /// Never fails: a payload that is not a JSON object yields
    /// [`TimerSnapshot::default`].
    pub fn resolve(payload: &str) -> Self {
        match serde_json::from_str::<Value>(payload) {
            Ok(Value::Object(fields)) => StoredRecord::from_fields(&fields).resolve(),
            Ok(other) => {
                tracing::warn!("stored timer record is not an object, using defaults: {other}");
                Self::default()
            }
            Err(e) => {
                tracing::warn!("stored timer record is malformed, using defaults: {e}");
                Self::default()
            }
        }
    }
}

/// On-disk shape with every field optional.
#[derive(Debug, Default)]
struct StoredRecord {
    interval: Option<u32>,
    break_time: Option<u32>,
    default_interval: Option<u32>,
    default_break_time: Option<u32>,
    permission: Option<PermissionState>,
}

impl StoredRecord {
    fn from_fields(fields: &Map<String, Value>) -> Self {
        Self {
            interval: seconds_field(fields, "interval"),
            break_time: seconds_field(fields, "breakTime"),
            default_interval: seconds_field(fields, "defaultInterval"),
            default_break_time: seconds_field(fields, "defaultBreakTime"),
            permission: fields
                .get("permission")
                .and_then(|value| PermissionState::deserialize(value).ok()),
        }
    }

    fn resolve(self) -> TimerSnapshot {
        let default_interval = resolve_default(self.default_interval, Channel::Interval);
        let default_break_time = resolve_default(self.default_break_time, Channel::BreakTime);

        TimerSnapshot {
            interval: self.interval.unwrap_or(default_interval),
            break_time: self.break_time.unwrap_or(default_break_time),
            default_interval,
            default_break_time,
            permission: self.permission.unwrap_or_default(),
        }
    }
}

fn seconds_field(fields: &Map<String, Value>, name: &str) -> Option<u32> {
    let value = fields.get(name)?;
    let seconds = value.as_u64().and_then(|n| u32::try_from(n).ok());
    if seconds.is_none() {
        tracing::warn!(field = name, "ignoring invalid stored value: {value}");
    }
    seconds
}

fn resolve_default(stored: Option<u32>, channel: Channel) -> u32 {
    match stored {
        Some(seconds) if seconds > 0 => seconds,
        _ => channel.default_seconds(),
    }
}

// ============================================================================
// Storage
// ============================================================================

/// Durable key-value slot for the serialized timer record.
pub trait Storage {
    /// Returns the stored payload, or `None` if nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// Replaces the stored payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn save(&self, payload: &str) -> Result<(), StorageError>;
}

/// Stores the record as `<dir>/<name>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Creates storage for the record `name` inside `dir`.
    pub fn new(dir: impl AsRef<Path>, name: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{name}.json")),
        }
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl Storage for FileStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn save(&self, payload: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        // Readers only ever see a complete record.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, payload).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;
        Ok(())
    }
}

/// In-memory record, mainly for tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    payload: Mutex<Option<String>>,
    saves: Mutex<usize>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage pre-loaded with `payload`.
    #[must_use]
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            payload: Mutex::new(Some(payload.into())),
            saves: Mutex::new(0),
        }
    }

    /// Returns the last saved payload.
    #[must_use]
    pub fn payload(&self) -> Option<String> {
        self.payload
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of saves performed.
    #[must_use]
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.payload())
    }

    fn save(&self, payload: &str) -> Result<(), StorageError> {
        *self.payload.lock().unwrap_or_else(PoisonError::into_inner) = Some(payload.to_string());
        *self.saves.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
