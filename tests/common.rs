#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{DateTime, Utc};
use rpunchclock::models::punch::PunchEvent;
use rpunchclock::models::punch_kind::PunchKind;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn rti() -> Command {
    cargo_bin_cmd!("rpunchclock")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rpunchclock.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Init the DB and record one full day (2025-03-10, 08:00-12:00 / 13:00-17:40
/// at UTC-3) for `employee`.
pub fn init_db_with_day(db_path: &str, employee: &str) {
    rti()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    for (kind, at) in [
        ("entry", "2025-03-10T08:00:00-03:00"),
        ("lunch_out", "2025-03-10T12:00:00-03:00"),
        ("lunch_return", "2025-03-10T13:00:00-03:00"),
        ("exit", "2025-03-10T17:40:00-03:00"),
    ] {
        rti()
            .args(["--db", db_path, "punch", employee, kind, "--at", at])
            .assert()
            .success();
    }
}

/// RFC 3339 instant → UTC.
pub fn utc(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .expect("valid RFC 3339 instant")
        .with_timezone(&Utc)
}

/// `HH:MM` on `day` (YYYY-MM-DD) at UTC-3.
pub fn brt(day: &str, hhmm: &str) -> DateTime<Utc> {
    utc(&format!("{day}T{hhmm}:00-03:00"))
}

pub fn punch(id: i64, employee: &str, kind: PunchKind, ts: DateTime<Utc>) -> PunchEvent {
    PunchEvent::new(id, employee, kind, ts, None)
}

/// The four punches of one day at UTC-3.
pub fn day_punches(
    first_id: i64,
    employee: &str,
    day: &str,
    times: [&str; 4],
) -> Vec<PunchEvent> {
    PunchKind::ALL
        .iter()
        .zip(times)
        .enumerate()
        .map(|(i, (kind, t))| punch(first_id + i as i64, employee, *kind, brt(day, t)))
        .collect()
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}
