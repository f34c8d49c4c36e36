//! Command definitions for the duotimer CLI.
//!
//! Uses clap derive macros both for process arguments and for the line
//! commands typed into an interactive session.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::types::Channel;

// ============================================================================
// CLI Structure
// ============================================================================

/// duotimer - a two-channel focus/break countdown timer
#[derive(Parser, Debug)]
#[command(
    name = "duotimer",
    version,
    about = "Two-channel focus/break countdown timer",
    long_about = "A terminal countdown timer with a deep-work interval and a break channel.\n\
                  Only one channel runs at a time; durations persist between sessions.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding the persisted timer record
    #[arg(long, global = true, env = "DUOTIMER_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run an interactive timer session
    Run(RunArgs),

    /// Show both channels from the saved record
    Status,

    /// Set a channel's full duration in minutes
    SetDefault {
        /// Channel to configure (interval | breakTime)
        channel: Channel,
        /// Duration in minutes (interval: 1-120, breakTime: 1-60)
        minutes: u32,
    },

    /// Override a channel's remaining time in seconds
    Set {
        /// Channel to modify (interval | breakTime)
        channel: Channel,
        /// Remaining seconds
        seconds: u32,
    },

    /// Restore a channel's remaining time to its full duration
    Reset {
        /// Channel to reset (interval | breakTime)
        channel: Channel,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Arguments for the run command
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Channel selected when the session opens
    #[arg(short, long, default_value = "interval")]
    pub channel: Channel,

    /// Start the selected channel immediately
    #[arg(short, long)]
    pub start: bool,

    /// Turn on desktop notifications for completions
    #[arg(short, long)]
    pub notify: bool,
}

// ============================================================================
// Session Line Commands
// ============================================================================

/// One line typed into an interactive session.
#[derive(Parser, Debug)]
#[command(
    name = "session",
    no_binary_name = true,
    disable_version_flag = true,
    disable_help_flag = true
)]
pub struct SessionLine {
    #[command(subcommand)]
    pub command: SessionCommand,
}

/// Commands accepted inside `duotimer run`.
///
/// Channel arguments default to the selected channel.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Start counting down
    Start { channel: Option<Channel> },
    /// Pause the countdown
    Pause { channel: Option<Channel> },
    /// Start if paused, pause if running
    #[command(alias = "t")]
    Toggle { channel: Option<Channel> },
    /// Restore the full duration
    Reset { channel: Option<Channel> },
    /// Switch the selected channel
    Select { channel: Channel },
    /// Set a channel's full duration in minutes
    Default { channel: Channel, minutes: u32 },
    /// Override a channel's remaining seconds
    Set { channel: Channel, seconds: u32 },
    /// Turn on desktop notifications
    Notify,
    /// Show both channels
    Status,
    /// End the session
    #[command(alias = "exit", alias = "q")]
    Quit,
}

impl SessionLine {
    /// Parses a whitespace-separated line.
    ///
    /// # Errors
    ///
    /// Returns clap's error (including help output) for unknown input.
    pub fn parse_line(line: &str) -> Result<SessionCommand, clap::Error> {
        Self::try_parse_from(line.split_whitespace()).map(|parsed| parsed.command)
    }
}

// ============================================================================
// Tests
// ============================================================================
