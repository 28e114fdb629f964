use chrono::{Duration, NaiveTime};
use rpunchclock::core::live_status::{LiveStatusEngine, PunchState};
use rpunchclock::core::logic::Core;
use rpunchclock::core::policy::AccountingPolicy;
use rpunchclock::core::sources::PunchRecorder;
use rpunchclock::db::pool::DbPool;
use rpunchclock::models::punch::NewPunch;
use rpunchclock::models::punch_kind::PunchKind;
use rpunchclock::models::schedule::ScheduleExpectation;
use rpunchclock::models::status::{Emphasis, Phase, StatusFrame};

mod common;
use common::brt;

const DAY: &str = "2025-03-10";

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn office() -> ScheduleExpectation {
    ScheduleExpectation::new(hm(8, 0), hm(17, 0), 60)
}

fn punches(entry: Option<&str>, out: Option<&str>, back: Option<&str>, exit: Option<&str>) -> PunchState {
    PunchState {
        entry: entry.map(|t| brt(DAY, t)),
        lunch_out: out.map(|t| brt(DAY, t)),
        lunch_return: back.map(|t| brt(DAY, t)),
        exit: exit.map(|t| brt(DAY, t)),
    }
}

fn eval(schedule: &ScheduleExpectation, state: &PunchState, now: &str) -> StatusFrame {
    Core::evaluate_live_status(schedule, state, brt(DAY, now), &AccountingPolicy::default())
}

#[test]
fn test_no_schedule_no_punch_is_undefined() {
    let f = eval(&ScheduleExpectation::default(), &PunchState::default(), "07:00");

    assert_eq!(f.phase, Phase::AwaitingScheduleEntry);
    assert_eq!(f.emphasis, Emphasis::Warning);
    assert_eq!(f.seconds_value, 0);
}

#[test]
fn test_before_entry_counts_down() {
    let f = eval(&office(), &PunchState::default(), "07:30");

    assert_eq!(f.phase, Phase::BeforeEntry);
    assert_eq!(f.seconds_value, 30 * 60);
    assert_eq!(f.emphasis, Emphasis::Neutral);
    assert_eq!(f.label, "Time until entry");
}

#[test]
fn test_late_entry_counts_up() {
    let f = eval(&office(), &PunchState::default(), "08:20");

    assert_eq!(f.phase, Phase::LateEntry);
    assert_eq!(f.seconds_value, 20 * 60);
    assert_eq!(f.lateness_seconds, 20 * 60);
    assert_eq!(f.emphasis, Emphasis::Warning);
}

#[test]
fn test_late_entry_registered_is_flagged() {
    let f = eval(&office(), &punches(Some("08:10"), None, None, None), "08:05");

    assert_eq!(f.phase, Phase::EntryRegistered);
    assert_eq!(f.emphasis, Emphasis::Warning);
    assert_eq!(f.label, "Entry registered (late)");
    assert_eq!(f.lateness_seconds, 10 * 60);
}

#[test]
fn test_early_entry_registered_until_expected_entry() {
    let state = punches(Some("07:50"), None, None, None);

    let f = eval(&office(), &state, "07:55");
    assert_eq!(f.phase, Phase::EntryRegistered);
    assert_eq!(f.emphasis, Emphasis::Neutral);
    assert_eq!(f.label, "Entry registered (on time)");
    assert_eq!(f.lateness_seconds, 0);

    assert_eq!(eval(&office(), &state, "08:00").phase, Phase::AwaitingLunch);
}

#[test]
fn test_late_arrival_goes_straight_to_awaiting_lunch() {
    let f = eval(&office(), &punches(Some("08:10"), None, None, None), "08:10");

    assert_eq!(f.phase, Phase::AwaitingLunch);
    assert_eq!(f.emphasis, Emphasis::Neutral);
    assert_eq!(f.lateness_seconds, 10 * 60);
}

#[test]
fn test_lateness_is_kept_after_entry() {
    let f = eval(&office(), &punches(Some("08:10"), None, None, None), "10:00");

    assert_eq!(f.phase, Phase::AwaitingLunch);
    assert_eq!(f.lateness_seconds, 10 * 60);
}

#[test]
fn test_within_and_exceeding_lunch() {
    let state = punches(Some("08:00"), Some("12:00"), None, None);

    let f = eval(&office(), &state, "12:40");
    assert_eq!(f.phase, Phase::WithinLunch);
    assert_eq!(f.seconds_value, 20 * 60);
    assert_eq!(f.emphasis, Emphasis::Info);

    let f = eval(&office(), &state, "13:00");
    assert_eq!(f.phase, Phase::WithinLunch);
    assert_eq!(f.seconds_value, 0);

    let f = eval(&office(), &state, "13:15");
    assert_eq!(f.phase, Phase::ExceedingLunch);
    assert_eq!(f.seconds_value, 15 * 60);
    assert_eq!(f.emphasis, Emphasis::Warning);
}

#[test]
fn test_lunch_allowance_from_schedule_or_default() {
    let short = ScheduleExpectation::new(hm(8, 0), hm(17, 0), 30);
    let state = punches(Some("08:00"), Some("12:00"), None, None);
    assert_eq!(eval(&short, &state, "12:40").phase, Phase::ExceedingLunch);

    let unset = ScheduleExpectation {
        lunch_duration_minutes: None,
        ..office()
    };
    let f = eval(&unset, &state, "12:40");
    assert_eq!(f.phase, Phase::WithinLunch);
    assert_eq!(f.seconds_value, 20 * 60);
}

#[test]
fn test_early_return_registered_then_shift_countdown() {
    let state = punches(Some("08:00"), Some("12:00"), Some("12:50"), None);

    assert_eq!(eval(&office(), &state, "12:55").phase, Phase::ReturnRegistered);

    let f = eval(&office(), &state, "15:00");
    assert_eq!(f.phase, Phase::BeforeExit);
    assert_eq!(f.seconds_value, 2 * 3600);
    assert_eq!(f.emphasis, Emphasis::Neutral);
}

#[test]
fn test_overtime_counts_past_expected_exit() {
    let state = punches(Some("08:00"), Some("12:00"), Some("13:00"), None);
    let f = eval(&office(), &state, "17:30");

    assert_eq!(f.phase, Phase::Overtime);
    assert_eq!(f.seconds_value, 30 * 60);
    assert_eq!(f.emphasis, Emphasis::Info);
}

#[test]
fn test_skipped_lunch_falls_through_to_exit_rules() {
    let state = punches(Some("08:00"), None, None, None);

    assert_eq!(eval(&office(), &state, "16:00").phase, Phase::AwaitingLunch);

    let f = eval(&office(), &state, "17:30");
    assert_eq!(f.phase, Phase::Overtime);
    assert_eq!(f.seconds_value, 30 * 60);
}

#[test]
fn test_exit_phases() {
    let on_time = punches(Some("08:00"), Some("12:00"), Some("13:00"), Some("17:00"));
    let f = eval(&office(), &on_time, "18:00");
    assert_eq!(f.phase, Phase::ExitOnTime);
    assert_eq!(f.emphasis, Emphasis::Neutral);

    let late = punches(Some("08:00"), Some("12:00"), Some("13:00"), Some("17:20"));
    let f = eval(&office(), &late, "18:00");
    assert_eq!(f.phase, Phase::ExitOvertime);
    assert_eq!(f.emphasis, Emphasis::Info);
    assert_eq!(f.seconds_value, 0);
}

#[test]
fn test_missing_exit_time_is_undefined() {
    let entry_only = ScheduleExpectation {
        expected_exit: None,
        ..office()
    };
    let state = punches(Some("08:00"), Some("12:00"), Some("13:00"), None);

    let f = eval(&entry_only, &state, "15:00");
    assert_eq!(f.phase, Phase::AwaitingScheduleExit);
    assert_eq!(f.emphasis, Emphasis::Warning);

    let done = punches(Some("08:00"), Some("12:00"), Some("13:00"), Some("17:00"));
    assert_eq!(eval(&entry_only, &done, "18:00").phase, Phase::DayComplete);
}

#[test]
fn test_entry_without_schedule() {
    let f = eval(
        &ScheduleExpectation::default(),
        &punches(Some("08:00"), None, None, None),
        "07:59",
    );
    assert_eq!(f.phase, Phase::EntryRegistered);
    assert_eq!(f.label, "Entry registered");
    assert_eq!(f.lateness_seconds, 0);
}

#[test]
fn test_overnight_shift_exit_next_day() {
    let night = ScheduleExpectation::new(hm(22, 0), hm(6, 0), 60);
    let state = PunchState {
        entry: Some(brt(DAY, "22:00")),
        ..PunchState::default()
    };
    let engine = LiveStatusEngine::from_policy(&AccountingPolicy::default());

    let f = engine.evaluate(&night, &state, brt("2025-03-11", "03:00"));
    assert_eq!(f.phase, Phase::AwaitingLunch);

    let f = engine.evaluate(&night, &state, brt("2025-03-11", "07:00"));
    assert_eq!(f.phase, Phase::Overtime);
    assert_eq!(f.seconds_value, 3600);
}

#[test]
fn test_evaluation_is_deterministic() {
    let state = punches(Some("08:10"), Some("12:00"), None, None);
    assert_eq!(eval(&office(), &state, "12:30"), eval(&office(), &state, "12:30"));
}

#[test]
fn test_every_state_and_minute_has_a_phase() {
    let schedules = [
        office(),
        ScheduleExpectation::default(),
        ScheduleExpectation {
            expected_exit: None,
            ..office()
        },
    ];
    let states = [
        punches(None, None, None, None),
        punches(Some("08:00"), None, None, None),
        punches(Some("08:00"), Some("12:00"), None, None),
        punches(Some("08:00"), Some("12:00"), Some("13:00"), None),
        punches(Some("08:00"), None, None, Some("17:00")),
        punches(Some("08:00"), Some("12:00"), Some("13:00"), Some("17:00")),
        // lunch return without lunch out
        punches(Some("08:00"), None, Some("13:00"), None),
    ];
    let engine = LiveStatusEngine::from_policy(&AccountingPolicy::default());
    let start = brt(DAY, "00:00");

    for schedule in &schedules {
        for state in &states {
            for minute in (0..24 * 60).step_by(7) {
                let f = engine.evaluate(schedule, state, start + Duration::minutes(minute));
                assert!(Phase::ALL.contains(&f.phase));
                assert!(!f.label.is_empty());
                if !f.phase.is_counting() {
                    assert_eq!(f.seconds_value, 0, "{:?} at minute {minute}", f.phase);
                }
                if state.exit.is_some() {
                    assert!(matches!(
                        f.phase,
                        Phase::ExitOnTime | Phase::ExitOvertime | Phase::DayComplete
                    ));
                }
            }
        }
    }
}

#[test]
fn test_todays_punch_state_from_database() {
    let policy = AccountingPolicy::default();
    let pool = DbPool::in_memory().unwrap();

    for (kind, t) in [(PunchKind::Entry, "08:10"), (PunchKind::LunchOut, "12:00")] {
        pool.record_punch(NewPunch {
            employee_id: "ana".into(),
            kind,
            timestamp: brt(DAY, t),
            geo: None,
        })
        .unwrap();
    }
    // yesterday, must not leak into today
    pool.record_punch(NewPunch {
        employee_id: "ana".into(),
        kind: PunchKind::Exit,
        timestamp: brt("2025-03-09", "17:00"),
        geo: None,
    })
    .unwrap();

    let now = brt(DAY, "12:30");
    let state = Core::todays_punch_state(&pool, "ana", &office(), now, &policy).unwrap();

    assert_eq!(state.entry, Some(brt(DAY, "08:10")));
    assert_eq!(state.lunch_out, Some(brt(DAY, "12:00")));
    assert_eq!(state.exit, None);

    let f = Core::evaluate_live_status(&office(), &state, now, &policy);
    assert_eq!(f.phase, Phase::WithinLunch);
    assert_eq!(f.seconds_value, 30 * 60);
    assert_eq!(f.lateness_seconds, 10 * 60);
}

fn record(pool: &DbPool, employee: &str, kind: PunchKind, day: &str, t: &str) {
    pool.record_punch(NewPunch {
        employee_id: employee.into(),
        kind,
        timestamp: brt(day, t),
        geo: None,
    })
    .unwrap();
}

#[test]
fn test_overnight_shift_keeps_entry_after_midnight() {
    let policy = AccountingPolicy::default();
    let night = ScheduleExpectation::new(hm(22, 0), hm(6, 0), 60);
    let pool = DbPool::in_memory().unwrap();
    record(&pool, "caio", PunchKind::Entry, DAY, "22:00");

    let now = brt("2025-03-11", "02:00");
    let state = Core::todays_punch_state(&pool, "caio", &night, now, &policy).unwrap();
    assert_eq!(state.entry, Some(brt(DAY, "22:00")));

    let f = Core::evaluate_live_status(&night, &state, now, &policy);
    assert_eq!(f.phase, Phase::AwaitingLunch);

    // lunch taken after midnight joins the same shift
    record(&pool, "caio", PunchKind::LunchOut, "2025-03-11", "02:10");
    let now = brt("2025-03-11", "02:40");
    let state = Core::todays_punch_state(&pool, "caio", &night, now, &policy).unwrap();
    assert_eq!(state.entry, Some(brt(DAY, "22:00")));
    assert_eq!(state.lunch_out, Some(brt("2025-03-11", "02:10")));

    let f = Core::evaluate_live_status(&night, &state, now, &policy);
    assert_eq!(f.phase, Phase::WithinLunch);
    assert_eq!(f.seconds_value, 30 * 60);
}

#[test]
fn test_previous_open_day_is_ignored_without_overnight_schedule() {
    let policy = AccountingPolicy::default();
    let pool = DbPool::in_memory().unwrap();
    record(&pool, "ana", PunchKind::Entry, "2025-03-09", "08:00");

    let now = brt(DAY, "07:00");
    let state = Core::todays_punch_state(&pool, "ana", &office(), now, &policy).unwrap();
    assert_eq!(state, PunchState::default());

    let f = Core::evaluate_live_status(&office(), &state, now, &policy);
    assert_eq!(f.phase, Phase::BeforeEntry);
}

#[test]
fn test_overnight_exit_after_midnight_closes_the_shift() {
    let policy = AccountingPolicy::default();
    let night = ScheduleExpectation::new(hm(22, 0), hm(6, 0), 60);
    let pool = DbPool::in_memory().unwrap();
    record(&pool, "caio", PunchKind::Entry, "2025-03-09", "22:00");
    record(&pool, "caio", PunchKind::Exit, DAY, "05:50");

    let now = brt(DAY, "07:00");
    let state = Core::todays_punch_state(&pool, "caio", &night, now, &policy).unwrap();
    assert_eq!(state.entry, Some(brt("2025-03-09", "22:00")));
    assert_eq!(state.exit, Some(brt(DAY, "05:50")));

    let f = Core::evaluate_live_status(&night, &state, now, &policy);
    assert_eq!(f.phase, Phase::ExitOnTime);
}
