//! Tick scheduling for the timer store.
//!
//! A [`Scheduler`] arms a periodic one-second tick for a channel and hands
//! back a [`TickHandle`]. Firings are delivered to the store by whoever owns
//! it, by calling [`TimerStore::tick`](super::TimerStore::tick) with the
//! handle. Ticks never mutate state on their own.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};

use crate::types::Channel;

/// Identifies one armed periodic tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickHandle {
    /// Unique per call to [`Scheduler::arm`]
    pub id: u64,
    /// Channel the tick counts down
    pub channel: Channel,
}

/// Arms and cancels periodic ticks.
pub trait Scheduler {
    /// Begins a periodic tick for `channel`.
    fn arm(&mut self, channel: Channel) -> TickHandle;

    /// Stops a tick previously returned by [`arm`](Scheduler::arm).
    ///
    /// Cancelling an unknown or already cancelled handle is a no-op.
    fn cancel(&mut self, handle: TickHandle);
}

// ============================================================================
// TokioScheduler
// ============================================================================

/// Scheduler driving ticks with `tokio::time::interval`.
///
/// Each armed tick runs as its own task and sends its handle on the channel
/// returned by [`TokioScheduler::new`]. Must be used inside a tokio runtime.
pub struct TokioScheduler {
    period: Duration,
    tick_tx: mpsc::UnboundedSender<TickHandle>,
    armed: Option<(TickHandle, JoinHandle<()>)>,
    next_id: u64,
}

impl TokioScheduler {
    /// Creates a scheduler firing every `period`, along with the receiver of
    /// its tick handles.
    pub fn new(period: Duration) -> (Self, mpsc::UnboundedReceiver<TickHandle>) {
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            period,
            tick_tx,
            armed: None,
            next_id: 0,
        };
        (scheduler, tick_rx)
    }

    /// Returns the handle of the currently armed tick, if any.
    pub fn armed(&self) -> Option<TickHandle> {
        self.armed.as_ref().map(|(handle, _)| *handle)
    }
}

impl Scheduler for TokioScheduler {
    fn arm(&mut self, channel: Channel) -> TickHandle {
        // Only one tick may be outstanding at a time.
        if let Some(previous) = self.armed() {
            self.cancel(previous);
        }

        self.next_id += 1;
        let handle = TickHandle {
            id: self.next_id,
            channel,
        };

        let tx = self.tick_tx.clone();
        let period = self.period;
        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                if tx.send(handle).is_err() {
                    break;
                }
            }
        });

        tracing::debug!(id = handle.id, channel = %channel, "tick armed");
        self.armed = Some((handle, task));
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        if self.armed() == Some(handle) {
            if let Some((_, task)) = self.armed.take() {
                task.abort();
                tracing::debug!(id = handle.id, channel = %handle.channel, "tick cancelled");
            }
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        if let Some((_, task)) = self.armed.take() {
            task.abort();
        }
    }
}

// ============================================================================
// ManualScheduler
// ============================================================================

/// Scheduler that never fires on its own.
///
/// Tests drive time by passing [`TimerStore::active_tick`](super::TimerStore::active_tick)
/// to [`TimerStore::tick`](super::TimerStore::tick). One-shot CLI commands use it
/// because they never start a countdown.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    armed: Vec<TickHandle>,
    arm_count: usize,
    cancel_count: usize,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the handles currently armed.
    #[must_use]
    pub fn armed(&self) -> &[TickHandle] {
        &self.armed
    }

    #[must_use]
    pub fn arm_count(&self) -> usize {
        self.arm_count
    }

    #[must_use]
    pub fn cancel_count(&self) -> usize {
        self.cancel_count
    }
}

impl Scheduler for ManualScheduler {
    fn arm(&mut self, channel: Channel) -> TickHandle {
        self.next_id += 1;
        self.arm_count += 1;
        let handle = TickHandle {
            id: self.next_id,
            channel,
        };
        self.armed.push(handle);
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        let before = self.armed.len();
        self.armed.retain(|armed| *armed != handle);
        if self.armed.len() != before {
            self.cancel_count += 1;
        }
    }
}
