//! Interactive timer session.
//!
//! Owns the store for the lifetime of `duotimer run` and multiplexes three
//! inputs on one task: tick firings from the scheduler, lines typed on stdin,
//! and store events to render. Everything that mutates the store happens on
//! this task, one input at a time.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::config::AppConfig;
use crate::notification::{DesktopNotifier, Notifier};
use crate::store::{Scheduler, Storage, TimerStore, TokioScheduler};
use crate::types::Channel;

use super::commands::{RunArgs, SessionCommand, SessionLine};
use super::display::Display;

/// Whether the session should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Session-local presentation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    selected: Channel,
}

impl Session {
    /// Opens a session with `selected` as the current channel.
    pub fn new(selected: Channel) -> Self {
        Self { selected }
    }

    pub fn selected(&self) -> Channel {
        self.selected
    }

    /// Parses and applies one input line.
    pub fn handle_line<S, P, N>(&mut self, store: &mut TimerStore<S, P, N>, line: &str) -> Flow
    where
        S: Scheduler,
        P: Storage,
        N: Notifier,
    {
        if line.trim().is_empty() {
            return Flow::Continue;
        }

        match SessionLine::parse_line(line) {
            Ok(command) => self.apply(store, command),
            Err(e) => {
                // clap renders its own help and usage text
                eprintln!("{e}");
                Flow::Continue
            }
        }
    }

    /// Applies a parsed command to the store.
    pub fn apply<S, P, N>(&mut self, store: &mut TimerStore<S, P, N>, command: SessionCommand) -> Flow
    where
        S: Scheduler,
        P: Storage,
        N: Notifier,
    {
        match command {
            SessionCommand::Start { channel } => store.start(channel.unwrap_or(self.selected)),
            SessionCommand::Pause { channel } => store.pause(channel.unwrap_or(self.selected)),
            SessionCommand::Toggle { channel } => store.toggle(channel.unwrap_or(self.selected)),
            SessionCommand::Reset { channel } => store.reset(channel.unwrap_or(self.selected)),
            SessionCommand::Select { channel } => {
                self.selected = channel;
                Display::show_selected(channel);
            }
            SessionCommand::Default { channel, minutes } => {
                match channel.limits().validate_minutes(minutes) {
                    Ok(seconds) => store.set_default(channel, seconds),
                    Err(e) => Display::show_error(&e),
                }
            }
            SessionCommand::Set { channel, seconds } => store.set_remaining(channel, seconds),
            SessionCommand::Notify => {
                store.enable_notifications();
            }
            SessionCommand::Status => {
                let rows: Vec<_> = Channel::ALL
                    .into_iter()
                    .map(|channel| (channel, store.channel(channel)))
                    .collect();
                Display::show_status(&rows, Some(self.selected));
            }
            SessionCommand::Quit => return Flow::Quit,
        }
        Flow::Continue
    }
}

/// Runs `duotimer run` until `quit`, Ctrl-C, or end of input.
///
/// After stdin closes the session keeps counting while a channel runs and
/// exits once nothing is running.
pub async fn run(config: &AppConfig, args: &RunArgs) -> Result<()> {
    let (scheduler, mut ticks) = TokioScheduler::new(config.tick_period);
    let mut store = TimerStore::new(scheduler, config.storage(), DesktopNotifier::new());
    let mut events = store.subscribe();
    let mut session = Session::new(args.channel);

    Display::show_session_banner(session.selected());
    if args.notify {
        store.enable_notifications();
    }
    if args.start {
        store.start(session.selected());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            Some(handle) = ticks.recv() => store.tick(handle),
            Some(event) = events.recv() => Display::render_event(&event),
            line = lines.next_line(), if stdin_open => {
                match line.context("failed to read from stdin")? {
                    Some(line) => {
                        if session.handle_line(&mut store, &line) == Flow::Quit {
                            break;
                        }
                    }
                    None => {
                        tracing::debug!("stdin closed");
                        stdin_open = false;
                    }
                }
            }
            _ = &mut ctrl_c => {
                tracing::debug!("interrupted");
                break;
            }
        }

        if !stdin_open && store.running_channel().is_none() {
            break;
        }
    }

    if let Some(channel) = store.running_channel() {
        store.pause(channel);
    }
    while let Ok(event) = events.try_recv() {
        Display::render_event(&event);
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::MockNotifier;
    use crate::store::{ManualScheduler, MemoryStorage};

    type TestStore = TimerStore<ManualScheduler, MemoryStorage, MockNotifier>;

    fn create_store() -> TestStore {
        TimerStore::new(ManualScheduler::new(), MemoryStorage::new(), MockNotifier::new())
    }

    #[test]
    fn test_start_uses_selected_channel() {
        let mut store = create_store();
        let mut session = Session::new(Channel::BreakTime);

        session.handle_line(&mut store, "start");

        assert!(store.is_running(Channel::BreakTime));
    }

    #[test]
    fn test_select_then_toggle() {
        let mut store = create_store();
        let mut session = Session::new(Channel::Interval);

        session.handle_line(&mut store, "select break");
        session.handle_line(&mut store, "toggle");

        assert_eq!(session.selected(), Channel::BreakTime);
        assert_eq!(store.running_channel(), Some(Channel::BreakTime));
    }

    #[test]
    fn test_explicit_channel_overrides_selection() {
        let mut store = create_store();
        let mut session = Session::new(Channel::Interval);

        session.handle_line(&mut store, "start breakTime");
        session.handle_line(&mut store, "pause breakTime");

        assert!(!store.is_running(Channel::Interval));
        assert!(!store.is_running(Channel::BreakTime));
    }

    #[test]
    fn test_default_in_minutes() {
        let mut store = create_store();
        let mut session = Session::new(Channel::Interval);

        session.handle_line(&mut store, "default breakTime 10");

        assert_eq!(store.default_seconds(Channel::BreakTime), 600);
    }

    #[test]
    fn test_default_out_of_range_rejected() {
        let mut store = create_store();
        let mut session = Session::new(Channel::Interval);

        session.handle_line(&mut store, "default breakTime 61");
        session.handle_line(&mut store, "default interval 0");

        assert_eq!(store.default_seconds(Channel::BreakTime), 1500);
        assert_eq!(store.default_seconds(Channel::Interval), 3600);
    }

    #[test]
    fn test_set_remaining() {
        let mut store = create_store();
        let mut session = Session::new(Channel::Interval);

        session.handle_line(&mut store, "set interval 90");

        assert_eq!(store.remaining(Channel::Interval), 90);
    }

    #[test]
    fn test_notify_requests_permission() {
        let mut store = create_store();
        let mut session = Session::new(Channel::Interval);

        session.handle_line(&mut store, "notify");

        assert!(store.permission().is_granted());
    }

    #[test]
    fn test_quit_and_blank_lines() {
        let mut store = create_store();
        let mut session = Session::new(Channel::Interval);

        assert_eq!(session.handle_line(&mut store, "   "), Flow::Continue);
        assert_eq!(session.handle_line(&mut store, "bogus"), Flow::Continue);
        assert_eq!(session.handle_line(&mut store, "quit"), Flow::Quit);
    }
}
