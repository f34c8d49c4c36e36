//! Core data types for the two-channel timer.
//!
//! This module defines:
//! - The closed set of countdown channels and their per-channel state
//! - A lookup table keyed by channel
//! - Duration bounds used when accepting user input
//! - The `HH:MM:SS` display decomposition

use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Default interval (focus) duration: one hour.
pub const DEFAULT_INTERVAL_SECONDS: u32 = 60 * 60;

/// Default break duration: 25 minutes.
pub const DEFAULT_BREAK_TIME_SECONDS: u32 = 25 * 60;

// ============================================================================
// Channel
// ============================================================================

/// One of the two independently tracked countdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Channel {
    /// Work/focus countdown
    #[default]
    Interval,
    /// Break countdown
    BreakTime,
}

impl Channel {
    /// Both channels, in display order.
    pub const ALL: [Channel; 2] = [Channel::Interval, Channel::BreakTime];

    /// Returns the wire name used in persisted records and notifications.
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Interval => "interval",
            Channel::BreakTime => "breakTime",
        }
    }

    /// Returns a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Channel::Interval => "Deep work",
            Channel::BreakTime => "Break",
        }
    }

    /// Returns the hard-coded default duration in seconds.
    pub fn default_seconds(&self) -> u32 {
        match self {
            Channel::Interval => DEFAULT_INTERVAL_SECONDS,
            Channel::BreakTime => DEFAULT_BREAK_TIME_SECONDS,
        }
    }

    /// Returns the input bounds for this channel's default duration.
    pub fn limits(&self) -> DurationLimits {
        match self {
            Channel::Interval => DurationLimits::minutes(1, 120),
            Channel::BreakTime => DurationLimits::minutes(1, 60),
        }
    }

    /// Returns the other channel.
    pub fn other(&self) -> Channel {
        match self {
            Channel::Interval => Channel::BreakTime,
            Channel::BreakTime => Channel::Interval,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "interval" | "work" | "focus" => Ok(Channel::Interval),
            "breaktime" | "break-time" | "break_time" | "break" => Ok(Channel::BreakTime),
            _ => Err(format!(
                "unknown channel '{s}' (expected 'interval' or 'breakTime')"
            )),
        }
    }
}

// ============================================================================
// ChannelState
// ============================================================================

/// Countdown state of a single channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelState {
    /// Seconds left on the current countdown
    pub remaining_seconds: u32,
    /// Configured full duration to reset to
    pub default_seconds: u32,
    /// Whether this channel currently has an armed tick
    pub running: bool,
}

impl ChannelState {
    /// Creates an idle channel with the given remaining and default durations.
    pub fn new(remaining_seconds: u32, default_seconds: u32) -> Self {
        Self {
            remaining_seconds,
            default_seconds,
            running: false,
        }
    }

    /// Creates an idle channel sitting at its default.
    pub fn idle(default_seconds: u32) -> Self {
        Self::new(default_seconds, default_seconds)
    }

    /// Returns the derived state-machine phase.
    pub fn phase(&self) -> ChannelPhase {
        if self.running {
            ChannelPhase::Running
        } else if self.remaining_seconds == self.default_seconds {
            ChannelPhase::Idle
        } else {
            ChannelPhase::Paused
        }
    }
}

/// Observable phase of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelPhase {
    /// Not running, sitting at its default
    Idle,
    /// Counting down
    Running,
    /// Stopped part-way through a countdown
    Paused,
}

impl ChannelPhase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelPhase::Idle => "idle",
            ChannelPhase::Running => "running",
            ChannelPhase::Paused => "paused",
        }
    }
}

// ============================================================================
// Channels
// ============================================================================

/// Lookup table holding one [`ChannelState`] per [`Channel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channels {
    interval: ChannelState,
    break_time: ChannelState,
}

impl Channels {
    /// Creates the table from explicit per-channel states.
    pub fn new(interval: ChannelState, break_time: ChannelState) -> Self {
        Self {
            interval,
            break_time,
        }
    }

    /// Iterates over `(channel, state)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Channel, &ChannelState)> {
        Channel::ALL.into_iter().map(move |channel| (channel, &self[channel]))
    }
}

impl Default for Channels {
    fn default() -> Self {
        Self::new(
            ChannelState::idle(DEFAULT_INTERVAL_SECONDS),
            ChannelState::idle(DEFAULT_BREAK_TIME_SECONDS),
        )
    }
}

impl Index<Channel> for Channels {
    type Output = ChannelState;

    fn index(&self, channel: Channel) -> &ChannelState {
        match channel {
            Channel::Interval => &self.interval,
            Channel::BreakTime => &self.break_time,
        }
    }
}

impl IndexMut<Channel> for Channels {
    fn index_mut(&mut self, channel: Channel) -> &mut ChannelState {
        match channel {
            Channel::Interval => &mut self.interval,
            Channel::BreakTime => &mut self.break_time,
        }
    }
}

// ============================================================================
// DurationLimits
// ============================================================================

/// Inclusive bounds for a channel's default duration, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationLimits {
    /// Smallest accepted duration
    pub min_seconds: u32,
    /// Largest accepted duration
    pub max_seconds: u32,
}

impl DurationLimits {
    /// Creates limits from a minute range.
    pub const fn minutes(min: u32, max: u32) -> Self {
        Self {
            min_seconds: min * 60,
            max_seconds: max * 60,
        }
    }

    /// Validates a duration given in minutes and returns it in seconds.
    pub fn validate_minutes(&self, minutes: u32) -> Result<u32, String> {
        let seconds = minutes.saturating_mul(60);
        if seconds < self.min_seconds || seconds > self.max_seconds {
            return Err(format!(
                "duration must be between {} and {} minutes",
                self.min_seconds / 60,
                self.max_seconds / 60
            ));
        }
        Ok(seconds)
    }
}

// ============================================================================
// FormattedTime
// ============================================================================

/// Zero-padded hours/minutes/seconds components of a duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedTime {
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
}

impl fmt::Display for FormattedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.hours, self.minutes, self.seconds)
    }
}

/// Splits a number of seconds into padded `HH`, `MM` and `SS` strings.
///
/// Hours are padded to at least two digits and are not capped.
pub fn format_time(total_seconds: u32) -> FormattedTime {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    FormattedTime {
        hours: format!("{hours:02}"),
        minutes: format!("{minutes:02}"),
        seconds: format!("{seconds:02}"),
    }
}

// ============================================================================
// Tests
// ============================================================================
