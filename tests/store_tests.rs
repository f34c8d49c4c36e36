//! Integration tests for the timer store.
//!
//! These tests drive the public API with a manual scheduler, in-memory
//! storage and a recording notifier, covering:
//! - Mutual exclusion between channels
//! - Countdown monotonicity and auto-reset on completion
//! - Idempotent pause/reset
//! - Persistence round-trip and malformed-record fallback
//! - Channel switch-over and completion notification scenarios

use duotimer::notification::{MockNotifier, PermissionState};
use duotimer::store::{ManualScheduler, MemoryStorage, TimerEvent, TimerSnapshot, TimerStore};
use duotimer::types::{Channel, ChannelPhase};

// ============================================================================
// Test Helpers
// ============================================================================

type TestStore = TimerStore<ManualScheduler, MemoryStorage, MockNotifier>;

fn create_store() -> TestStore {
    TimerStore::new(ManualScheduler::new(), MemoryStorage::new(), MockNotifier::new())
}

fn create_store_from(storage: MemoryStorage) -> TestStore {
    TimerStore::new(ManualScheduler::new(), storage, MockNotifier::new())
}

/// Fires the active tick `seconds` times.
fn advance(store: &mut TestStore, seconds: u32) {
    for _ in 0..seconds {
        if let Some(handle) = store.active_tick() {
            store.tick(handle);
        }
    }
}

fn running_count(store: &TestStore) -> usize {
    Channel::ALL
        .into_iter()
        .filter(|channel| store.is_running(*channel))
        .count()
}

// ============================================================================
// Mutual Exclusion
// ============================================================================

#[test]
fn at_most_one_channel_runs_for_any_start_sequence() {
    let sequences: [&[Channel]; 5] = [
        &[Channel::Interval],
        &[Channel::Interval, Channel::BreakTime],
        &[Channel::BreakTime, Channel::Interval, Channel::BreakTime],
        &[Channel::Interval, Channel::Interval, Channel::BreakTime],
        &[Channel::BreakTime, Channel::BreakTime, Channel::Interval, Channel::Interval],
    ];

    for sequence in sequences {
        let mut store = create_store();
        for channel in sequence {
            store.start(*channel);
            assert!(running_count(&store) <= 1);
            assert!(store.scheduler().armed().len() <= 1);
        }
        let last = *sequence.last().unwrap();
        assert_eq!(store.running_channel(), Some(last));
    }
}

// ============================================================================
// Countdown
// ============================================================================

#[test]
fn each_tick_decrements_by_exactly_one() {
    let mut store = create_store();
    store.start(Channel::BreakTime);

    let mut previous = store.remaining(Channel::BreakTime);
    for _ in 0..20 {
        advance(&mut store, 1);
        let current = store.remaining(Channel::BreakTime);
        assert_eq!(current, previous - 1);
        previous = current;
    }
}

#[test]
fn reaching_zero_resets_within_the_same_tick() {
    let mut store = create_store();
    store.set_remaining(Channel::Interval, 2);
    store.start(Channel::Interval);

    advance(&mut store, 1);
    assert_eq!(store.remaining(Channel::Interval), 1);
    assert!(store.is_running(Channel::Interval));

    advance(&mut store, 1);
    assert!(!store.is_running(Channel::Interval));
    assert_eq!(store.remaining(Channel::Interval), 3600);
    assert_eq!(store.phase(Channel::Interval), ChannelPhase::Idle);
    assert!(store.active_tick().is_none());
}

// ============================================================================
// Idempotence
// ============================================================================

#[test]
fn pause_and_reset_on_idle_channel_change_nothing() {
    let mut store = create_store();
    let before = store.snapshot();
    let mut events = store.subscribe();

    store.pause(Channel::Interval);
    store.pause(Channel::Interval);
    store.reset(Channel::BreakTime);
    store.reset(Channel::BreakTime);

    assert_eq!(store.snapshot(), before);
    assert_eq!(running_count(&store), 0);
    while let Ok(event) = events.try_recv() {
        assert!(matches!(event, TimerEvent::Reset { .. }));
    }
}

#[test]
fn pause_on_paused_channel_keeps_value() {
    let mut store = create_store();
    store.start(Channel::Interval);
    advance(&mut store, 3);
    store.pause(Channel::Interval);
    store.pause(Channel::Interval);

    assert_eq!(store.remaining(Channel::Interval), 3597);
    assert_eq!(store.scheduler().cancel_count(), 1);
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn snapshot_round_trip_initializes_exact_values() {
    let storage = MemoryStorage::with_payload(
        r#"{"interval":1800,"breakTime":600,"defaultInterval":1800,"defaultBreakTime":600}"#,
    );
    let store = create_store_from(storage);

    assert_eq!(store.remaining(Channel::Interval), 1800);
    assert_eq!(store.remaining(Channel::BreakTime), 600);
    assert_eq!(store.default_seconds(Channel::Interval), 1800);
    assert_eq!(store.default_seconds(Channel::BreakTime), 600);
}

#[test]
fn absent_snapshot_initializes_defaults() {
    let store = create_store();

    assert_eq!(store.remaining(Channel::Interval), 3600);
    assert_eq!(store.remaining(Channel::BreakTime), 1500);
}

#[test]
fn empty_or_malformed_snapshot_initializes_defaults() {
    for payload in ["", "{}", "true", "{\"interval\":-4}", "null"] {
        let store = create_store_from(MemoryStorage::with_payload(payload));

        assert_eq!(store.remaining(Channel::Interval), 3600, "payload {payload:?}");
        assert_eq!(store.remaining(Channel::BreakTime), 1500, "payload {payload:?}");
    }
}

#[test]
fn every_mutation_writes_the_full_snapshot() {
    let mut store = create_store();
    store.set_default(Channel::BreakTime, 300);
    store.start(Channel::BreakTime);
    advance(&mut store, 10);
    store.pause(Channel::BreakTime);

    let saved = TimerSnapshot::resolve(&store.storage().payload().unwrap());
    assert_eq!(saved, store.snapshot());
    assert_eq!(saved.break_time, 290);
    assert_eq!(saved.default_break_time, 300);

    // A fresh store picks up where this one left off.
    let reloaded = create_store_from(MemoryStorage::with_payload(
        store.storage().payload().unwrap(),
    ));
    assert_eq!(reloaded.remaining(Channel::BreakTime), 290);
    assert_eq!(reloaded.phase(Channel::BreakTime), ChannelPhase::Paused);
    assert!(!reloaded.is_running(Channel::BreakTime));
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn switching_channels_pauses_without_reset() {
    let mut store = create_store();
    store.start(Channel::Interval);
    advance(&mut store, 5);

    assert_eq!(
        store.remaining(Channel::Interval),
        store.default_seconds(Channel::Interval) - 5
    );

    store.start(Channel::BreakTime);

    assert!(!store.is_running(Channel::Interval));
    assert!(store.is_running(Channel::BreakTime));
    assert_eq!(store.remaining(Channel::Interval), 3595);

    advance(&mut store, 2);
    assert_eq!(store.remaining(Channel::Interval), 3595);
    assert_eq!(store.remaining(Channel::BreakTime), 1498);
}

#[test]
fn completion_requests_exactly_one_notification() {
    let mut store = create_store();
    assert_eq!(store.enable_notifications(), PermissionState::Granted);
    store.notifier().clear_recorded();

    store.set_default(Channel::BreakTime, 2);
    store.start(Channel::BreakTime);
    advance(&mut store, 2);

    assert_eq!(store.phase(Channel::BreakTime), ChannelPhase::Idle);
    assert_eq!(store.remaining(Channel::BreakTime), 2);

    let messages = store.notifier().messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("breakTime"));
    assert_eq!(messages[0], "breakTime is completed");
}

#[test]
fn completed_channel_can_run_again() {
    let mut store = create_store();
    store.set_default(Channel::Interval, 1);

    for _ in 0..3 {
        store.start(Channel::Interval);
        advance(&mut store, 1);
        assert_eq!(store.phase(Channel::Interval), ChannelPhase::Idle);
    }
    assert_eq!(store.scheduler().arm_count(), 3);
}

#[test]
fn notification_opt_in_survives_restart() {
    let mut first = create_store();
    assert_eq!(first.enable_notifications(), PermissionState::Granted);
    first.set_default(Channel::BreakTime, 1);
    let payload = first.storage().payload().unwrap();

    let mut second = create_store_from(MemoryStorage::with_payload(payload));
    assert_eq!(second.permission(), PermissionState::Granted);

    second.start(Channel::BreakTime);
    advance(&mut second, 1);

    assert_eq!(second.notifier().messages(), vec!["breakTime is completed"]);
    assert_eq!(second.notifier().permission_requests(), 0);
}

#[test]
fn record_written_before_permission_existed_still_loads() {
    let store = create_store_from(MemoryStorage::with_payload(
        r#"{"interval":3600,"breakTime":1,"defaultInterval":3600,"defaultBreakTime":1}"#,
    ));

    assert_eq!(store.remaining(Channel::BreakTime), 1);
    assert_eq!(store.permission(), PermissionState::Default);
}
