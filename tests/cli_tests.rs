//! End-to-end tests for the duotimer binary.
//!
//! Each test points the binary at its own temporary data directory and checks
//! both the printed output and the persisted timer record.

use std::path::Path;
use std::time::Duration;

use assert_cmd::Command;
use predicates::prelude::*;

use duotimer::store::TimerSnapshot;

// ============================================================================
// Test Helpers
// ============================================================================

fn duotimer(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("duotimer").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("DUOTIMER_DATA_DIR")
        .arg("--data-dir")
        .arg(data_dir)
        .timeout(Duration::from_secs(15));
    cmd
}

fn read_record(data_dir: &Path) -> TimerSnapshot {
    let payload = std::fs::read_to_string(data_dir.join("timer-store.json")).unwrap();
    serde_json::from_str(&payload).unwrap()
}

// ============================================================================
// One-shot Commands
// ============================================================================

#[test]
fn status_without_record_shows_defaults() {
    let dir = tempfile::tempdir().unwrap();

    duotimer(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("interval   01:00:00 / 01:00:00  idle"))
        .stdout(predicate::str::contains("breakTime  00:25:00 / 00:25:00  idle"));
}

#[test]
fn status_with_malformed_record_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("timer-store.json"), "{ not json").unwrap();

    duotimer(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("01:00:00 / 01:00:00"));
}

#[test]
fn set_default_persists_and_follows_idle_channel() {
    let dir = tempfile::tempdir().unwrap();

    duotimer(dir.path())
        .args(["set-default", "breakTime", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("breakTime duration set to 00:10:00"));

    let record = read_record(dir.path());
    assert_eq!(record.default_break_time, 600);
    assert_eq!(record.break_time, 600);
    assert_eq!(record.default_interval, 3600);
}

#[test]
fn set_default_out_of_range_fails() {
    let dir = tempfile::tempdir().unwrap();

    duotimer(dir.path())
        .args(["set-default", "breakTime", "61"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 1 and 60 minutes"));

    assert!(!dir.path().join("timer-store.json").exists());
}

#[test]
fn set_then_reset_restores_default() {
    let dir = tempfile::tempdir().unwrap();

    duotimer(dir.path())
        .args(["set", "interval", "90"])
        .assert()
        .success();
    assert_eq!(read_record(dir.path()).interval, 90);

    duotimer(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("00:01:30 / 01:00:00  paused"));

    duotimer(dir.path())
        .args(["reset", "interval"])
        .assert()
        .success()
        .stdout(predicate::str::contains("interval reset to 01:00:00"));
    assert_eq!(read_record(dir.path()).interval, 3600);
}

#[test]
fn unknown_channel_is_rejected() {
    let dir = tempfile::tempdir().unwrap();

    duotimer(dir.path())
        .args(["reset", "lunch"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown channel"));
}

#[test]
fn completions_are_generated() {
    let dir = tempfile::tempdir().unwrap();

    duotimer(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("duotimer"));
}

// ============================================================================
// Interactive Session
// ============================================================================

#[test]
fn session_quit_pauses_and_saves() {
    let dir = tempfile::tempdir().unwrap();

    duotimer(dir.path())
        .arg("run")
        .write_stdin("start\nstatus\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("> interval started"))
        .stdout(predicate::str::contains("|| interval paused"));

    let record = read_record(dir.path());
    assert_eq!(record.default_interval, 3600);
}

#[test]
fn session_runs_countdown_to_completion_after_input_ends() {
    let dir = tempfile::tempdir().unwrap();

    duotimer(dir.path())
        .args(["run", "--channel", "breakTime"])
        .write_stdin("set breakTime 2\nstart\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("breakTime  00:00:01"))
        .stdout(predicate::str::contains("* breakTime is completed"));

    let record = read_record(dir.path());
    assert_eq!(record.break_time, 1500);
    assert_eq!(record.interval, 3600);
}

#[test]
fn session_ignores_bad_input() {
    let dir = tempfile::tempdir().unwrap();

    duotimer(dir.path())
        .arg("run")
        .write_stdin("launch rockets\ndefault interval 500\nselect break\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("selected breakTime"))
        .stderr(predicate::str::contains("between 1 and 120 minutes"));
}
