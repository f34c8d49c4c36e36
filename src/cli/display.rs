//! Display utilities for the duotimer CLI.
//!
//! This module provides formatted output for:
//! - Channel status rows
//! - Live countdown rendering from store events
//! - Success and error messages

use std::io::{self, Write};

use crate::notification::PermissionState;
use crate::store::TimerEvent;
use crate::types::{format_time, Channel, ChannelState};

/// Returns the cursor to column 0 and erases the in-place countdown.
const CLEAR_LINE: &str = "\r\x1b[2K";

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows both channels, marking the selected one.
    pub fn show_status(rows: &[(Channel, ChannelState)], selected: Option<Channel>) {
        println!("duotimer status");
        println!("─────────────────────────────────────────");
        for (channel, state) in rows {
            let marker = if Some(*channel) == selected { ">" } else { " " };
            println!("{marker} {}", Self::channel_line(*channel, state));
        }
    }

    /// Formats one status row, e.g. `interval   00:59:50 / 01:00:00  paused`.
    pub fn channel_line(channel: Channel, state: &ChannelState) -> String {
        format!(
            "{:<10} {} / {}  {}",
            channel.as_str(),
            format_time(state.remaining_seconds),
            format_time(state.default_seconds),
            state.phase().as_str()
        )
    }

    /// Renders a store event.
    ///
    /// Ticks redraw the countdown in place; every other event gets its own line.
    pub fn render_event(event: &TimerEvent) {
        print!("{}", Self::rendered(event));
        let _ = io::stdout().flush();
    }

    /// Returns the terminal text for an event, including cursor control.
    pub fn rendered(event: &TimerEvent) -> String {
        match event {
            TimerEvent::Tick {
                channel,
                remaining_seconds,
            } => format!(
                "{CLEAR_LINE}{:<10} {}",
                channel.as_str(),
                format_time(*remaining_seconds)
            ),
            other => Self::event_line(other)
                .map(|line| format!("{CLEAR_LINE}{line}\n"))
                .unwrap_or_default(),
        }
    }

    /// Returns the message line for a non-tick event.
    pub fn event_line(event: &TimerEvent) -> Option<String> {
        let line = match event {
            TimerEvent::Started { channel } => format!("> {} started", channel.as_str()),
            TimerEvent::Paused {
                channel,
                remaining_seconds,
            } => format!(
                "|| {} paused at {}",
                channel.as_str(),
                format_time(*remaining_seconds)
            ),
            TimerEvent::Reset { channel } => format!("[] {} reset", channel.as_str()),
            TimerEvent::Completed { channel } => format!("* {} is completed", channel.as_str()),
            TimerEvent::DefaultChanged {
                channel,
                default_seconds,
            } => format!(
                "{} duration set to {}",
                channel.as_str(),
                format_time(*default_seconds)
            ),
            TimerEvent::RemainingChanged {
                channel,
                remaining_seconds,
            } => format!(
                "{} remaining set to {}",
                channel.as_str(),
                format_time(*remaining_seconds)
            ),
            TimerEvent::PermissionChanged { permission } => {
                format!("notifications: {}", Self::permission_label(*permission))
            }
            TimerEvent::Tick { .. } => return None,
        };
        Some(line)
    }

    /// Shows the banner printed when a session opens.
    pub fn show_session_banner(selected: Channel) {
        println!("duotimer session - selected: {} ({})", selected.as_str(), selected.label());
        println!("commands: start, pause, toggle, reset, select, default, set, notify, status, quit");
    }

    /// Shows that a channel was selected.
    pub fn show_selected(channel: Channel) {
        println!("selected {} ({})", channel.as_str(), channel.label());
    }

    /// Shows the result of a one-shot duration change.
    pub fn show_default_updated(channel: Channel, state: &ChannelState) {
        println!("* {} duration set to {}", channel.as_str(), format_time(state.default_seconds));
    }

    /// Shows the result of a one-shot remaining-time change.
    pub fn show_remaining_updated(channel: Channel, state: &ChannelState) {
        println!("* {} remaining set to {}", channel.as_str(), format_time(state.remaining_seconds));
    }

    /// Shows the result of a one-shot reset.
    pub fn show_reset(channel: Channel, state: &ChannelState) {
        println!("[] {} reset to {}", channel.as_str(), format_time(state.remaining_seconds));
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("error: {message}");
    }

    fn permission_label(permission: PermissionState) -> &'static str {
        match permission {
            PermissionState::Granted => "enabled",
            PermissionState::Denied => "denied",
            PermissionState::Default => "not enabled",
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
