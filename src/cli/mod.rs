//! CLI module for duotimer.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `display`: Output formatting and display logic
//! - `session`: The interactive `run` loop

pub mod commands;
pub mod display;
pub mod session;

pub use commands::{Cli, Commands, RunArgs, SessionCommand, SessionLine};
pub use display::Display;
pub use session::{Flow, Session};

use crate::config::AppConfig;
use crate::notification::DesktopNotifier;
use crate::store::{FileStorage, ManualScheduler, TimerStore};

/// Store used by one-shot subcommands.
pub type OfflineStore = TimerStore<ManualScheduler, FileStorage, DesktopNotifier>;

/// Opens the persisted record without arming any ticks.
pub fn open_offline_store(config: &AppConfig) -> OfflineStore {
    TimerStore::new(ManualScheduler::new(), config.storage(), DesktopNotifier::new())
}
