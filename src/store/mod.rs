//! Timer store for the two countdown channels.
//!
//! [`TimerStore`] is the single source of truth for both channels:
//! - Mutual exclusion (at most one channel running)
//! - One-second countdown through an injected [`Scheduler`]
//! - Auto-reset and notification on completion
//! - Persistence of every change, including the notification permission,
//!   through an injected [`Storage`]
//! - Change events pushed to subscribers

pub mod persistence;
pub mod scheduler;

use tokio::sync::mpsc;

use crate::notification::{
    completion_message, Notifier, PermissionState, ALREADY_ENABLED_MESSAGE, ENABLED_MESSAGE,
};
use crate::types::{Channel, ChannelPhase, ChannelState, Channels};

pub use self::persistence::{FileStorage, MemoryStorage, Storage, StorageError, TimerSnapshot};
pub use self::scheduler::{ManualScheduler, Scheduler, TickHandle, TokioScheduler};

// ============================================================================
// TimerEvent
// ============================================================================

/// State changes pushed to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// Channel began counting down
    Started { channel: Channel },
    /// Channel stopped part-way
    Paused {
        channel: Channel,
        remaining_seconds: u32,
    },
    /// Channel restored to its default
    Reset { channel: Channel },
    /// One second elapsed
    Tick {
        channel: Channel,
        remaining_seconds: u32,
    },
    /// Channel reached zero and was reset
    Completed { channel: Channel },
    /// Configured duration changed
    DefaultChanged {
        channel: Channel,
        default_seconds: u32,
    },
    /// Remaining time overridden
    RemainingChanged {
        channel: Channel,
        remaining_seconds: u32,
    },
    /// Notification permission changed
    PermissionChanged { permission: PermissionState },
}

// ============================================================================
// TimerStore
// ============================================================================

/// Owns both channels and the single active tick.
pub struct TimerStore<S, P, N> {
    channels: Channels,
    active: Option<TickHandle>,
    permission: PermissionState,
    scheduler: S,
    storage: P,
    notifier: N,
    subscribers: Vec<mpsc::UnboundedSender<TimerEvent>>,
}

impl<S, P, N> TimerStore<S, P, N>
where
    S: Scheduler,
    P: Storage,
    N: Notifier,
{
    /// Creates a store initialized from `storage`, or from the hard-coded
    /// defaults when nothing usable is stored.
    pub fn new(scheduler: S, storage: P, notifier: N) -> Self {
        let snapshot = match storage.load() {
            Ok(Some(payload)) => TimerSnapshot::resolve(&payload),
            Ok(None) => {
                tracing::debug!("no stored timer record, using defaults");
                TimerSnapshot::default()
            }
            Err(e) => {
                tracing::warn!("failed to load timer record, using defaults: {e}");
                TimerSnapshot::default()
            }
        };

        Self {
            channels: snapshot.to_channels(),
            active: None,
            permission: snapshot.permission,
            scheduler,
            storage,
            notifier,
            subscribers: Vec::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------------

    /// Sets the configured duration of `channel`.
    ///
    /// Zero is raised to one second. An idle channel follows the new default
    /// immediately; otherwise the remaining time catches up on the next reset.
    pub fn set_default(&mut self, channel: Channel, seconds: u32) {
        let seconds = if seconds == 0 {
            tracing::warn!(channel = %channel, "default duration of 0s raised to 1s");
            1
        } else {
            seconds
        };

        let state = &mut self.channels[channel];
        let was_idle = state.phase() == ChannelPhase::Idle;
        state.default_seconds = seconds;
        if was_idle {
            state.remaining_seconds = seconds;
        }

        self.emit(TimerEvent::DefaultChanged {
            channel,
            default_seconds: seconds,
        });
        self.persist();
    }

    /// Overrides the remaining time of `channel`.
    pub fn set_remaining(&mut self, channel: Channel, seconds: u32) {
        self.channels[channel].remaining_seconds = seconds;

        self.emit(TimerEvent::RemainingChanged {
            channel,
            remaining_seconds: seconds,
        });
        self.persist();
    }

    /// Starts counting down `channel`, pausing the other one first.
    ///
    /// No-op if `channel` is already running.
    pub fn start(&mut self, channel: Channel) {
        if self.channels[channel].running {
            return;
        }

        let other = channel.other();
        if self.channels[other].running {
            self.pause(other);
        }

        self.channels[channel].running = true;
        self.active = Some(self.scheduler.arm(channel));
        tracing::info!(channel = %channel, remaining = self.channels[channel].remaining_seconds, "started");

        self.emit(TimerEvent::Started { channel });
        self.persist();
    }

    /// Stops counting down `channel`. No-op if it is not running.
    pub fn pause(&mut self, channel: Channel) {
        if !self.channels[channel].running {
            return;
        }

        self.disarm(channel);
        self.channels[channel].running = false;
        let remaining_seconds = self.channels[channel].remaining_seconds;
        tracing::info!(channel = %channel, remaining = remaining_seconds, "paused");

        self.emit(TimerEvent::Paused {
            channel,
            remaining_seconds,
        });
        self.persist();
    }

    /// Pauses `channel` if running, then restores its default duration.
    pub fn reset(&mut self, channel: Channel) {
        self.pause(channel);

        let state = &mut self.channels[channel];
        state.remaining_seconds = state.default_seconds;

        self.emit(TimerEvent::Reset { channel });
        self.persist();
    }

    /// Pauses `channel` if running, otherwise starts it.
    pub fn toggle(&mut self, channel: Channel) {
        if self.channels[channel].running {
            self.pause(channel);
        } else {
            self.start(channel);
        }
    }

    /// Applies one firing of the tick identified by `handle`.
    ///
    /// Firings from a tick that is no longer active are ignored. Reaching
    /// zero completes the channel within the same call.
    pub fn tick(&mut self, handle: TickHandle) {
        if self.active != Some(handle) {
            tracing::debug!(id = handle.id, channel = %handle.channel, "ignoring stale tick");
            return;
        }

        let channel = handle.channel;
        let state = &mut self.channels[channel];
        state.remaining_seconds = state.remaining_seconds.saturating_sub(1);
        let remaining_seconds = state.remaining_seconds;

        self.emit(TimerEvent::Tick {
            channel,
            remaining_seconds,
        });

        if remaining_seconds == 0 {
            self.complete(channel);
        }
        self.persist();
    }

    /// Opts in to notifications, asking for permission on first use.
    ///
    /// The answer is persisted, so a later store starts from it. A denied
    /// permission is not asked for again.
    pub fn enable_notifications(&mut self) -> PermissionState {
        match self.permission {
            PermissionState::Granted => self.send_notification(ALREADY_ENABLED_MESSAGE),
            PermissionState::Denied => {
                tracing::info!("notification permission was denied earlier");
            }
            PermissionState::Default => {
                let permission = self.notifier.request_permission();
                self.set_permission(permission);
                self.persist();

                if permission.is_granted() {
                    self.send_notification(ENABLED_MESSAGE);
                } else {
                    tracing::info!(permission = permission.as_str(), "notifications not enabled");
                }
            }
        }
        self.permission
    }

    /// Returns a receiver for every subsequent [`TimerEvent`].
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<TimerEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn remaining(&self, channel: Channel) -> u32 {
        self.channels[channel].remaining_seconds
    }

    pub fn default_seconds(&self, channel: Channel) -> u32 {
        self.channels[channel].default_seconds
    }

    pub fn is_running(&self, channel: Channel) -> bool {
        self.channels[channel].running
    }

    pub fn phase(&self, channel: Channel) -> ChannelPhase {
        self.channels[channel].phase()
    }

    /// Returns a copy of a channel's state.
    pub fn channel(&self, channel: Channel) -> ChannelState {
        self.channels[channel]
    }

    /// Returns the channel currently counting down, if any.
    pub fn running_channel(&self) -> Option<Channel> {
        self.channels
            .iter()
            .find(|(_, state)| state.running)
            .map(|(channel, _)| channel)
    }

    /// Returns the handle of the armed tick, if any.
    pub fn active_tick(&self) -> Option<TickHandle> {
        self.active
    }

    pub fn permission(&self) -> PermissionState {
        self.permission
    }

    /// Returns the record that is persisted on every change.
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot::from_channels(&self.channels, self.permission)
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn storage(&self) -> &P {
        &self.storage
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn complete(&mut self, channel: Channel) {
        self.disarm(channel);

        let state = &mut self.channels[channel];
        state.running = false;
        state.remaining_seconds = state.default_seconds;
        tracing::info!(channel = %channel, "completed");

        self.emit(TimerEvent::Completed { channel });

        if self.permission.is_granted() {
            self.send_notification(&completion_message(channel));
        }
    }

    /// Cancels the active tick if it belongs to `channel`.
    fn disarm(&mut self, channel: Channel) {
        if let Some(handle) = self.active {
            if handle.channel == channel {
                self.scheduler.cancel(handle);
                self.active = None;
            }
        }
    }

    /// Shows `message`. A facility that refuses revokes the stored permission.
    fn send_notification(&mut self, message: &str) {
        match self.notifier.notify(message) {
            Ok(()) => {}
            Err(e) if e.is_permission_error() => {
                tracing::warn!("notifications were refused: {e} ({})", e.suggestion());
                self.set_permission(PermissionState::Denied);
                self.persist();
            }
            Err(e) => {
                tracing::warn!("failed to show notification: {e} ({})", e.suggestion());
            }
        }
    }

    fn set_permission(&mut self, permission: PermissionState) {
        self.permission = permission;
        self.emit(TimerEvent::PermissionChanged { permission });
    }

    fn persist(&self) {
        let result = serde_json::to_string(&self.snapshot())
            .map_err(StorageError::from)
            .and_then(|payload| self.storage.save(&payload));

        if let Err(e) = result {
            tracing::warn!("failed to persist timer record: {e}");
        }
    }

    fn emit(&mut self, event: TimerEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

// ============================================================================
// Tests
// ============================================================================
