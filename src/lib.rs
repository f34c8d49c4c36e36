//! duotimer library
//!
//! This library provides the core of the duotimer CLI:
//! - Timer store with two mutually exclusive countdown channels
//! - Injectable tick scheduling, persistence and notification capabilities
//! - CLI command parsing, interactive session and display utilities
//! - Type definitions for channels, durations and time formatting

pub mod cli;
pub mod config;
pub mod notification;
pub mod store;
pub mod types;

// Re-export commonly used types for convenience
pub use config::{AppConfig, ConfigError};
pub use notification::{
    DesktopNotifier, MockNotifier, NotificationError, Notifier, PermissionState,
};
pub use store::{
    FileStorage, ManualScheduler, MemoryStorage, Scheduler, Storage, StorageError, TickHandle,
    TimerEvent, TimerSnapshot, TimerStore, TokioScheduler,
};
pub use types::{format_time, Channel, ChannelPhase, ChannelState, FormattedTime};
