use chrono::{NaiveDate, NaiveTime, Utc};
use rpunchclock::core::logic::Core;
use rpunchclock::core::payroll::{PayrollLogic, PayrollRequest, month_bounds};
use rpunchclock::core::policy::AccountingPolicy;
use rpunchclock::core::sources::{PayrollStore, PunchRecorder};
use rpunchclock::db::pool::DbPool;
use rpunchclock::db::queries::{count_payroll_periods, save_schedule};
use rpunchclock::errors::AppError;
use rpunchclock::models::punch::NewPunch;
use rpunchclock::models::punch_kind::PunchKind;
use rpunchclock::models::schedule::ScheduleExpectation;

mod common;
use common::{assert_close, brt, day_punches};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn march_request(rate: f64) -> PayrollRequest {
    PayrollRequest::new("ana", date(2025, 3, 1), date(2025, 3, 31), rate)
}

/// Two days: 8h40 and 8h.
fn seeded_pool() -> DbPool {
    let pool = DbPool::in_memory().unwrap();
    let mut punches = day_punches(0, "ana", "2025-03-10", ["08:00", "12:00", "13:00", "17:40"]);
    punches.extend(day_punches(0, "ana", "2025-03-11", ["08:00", "12:00", "14:00", "17:00"]));
    // outside the period
    punches.extend(day_punches(0, "ana", "2025-04-01", ["08:00", "12:00", "13:00", "17:00"]));

    for p in punches {
        pool.record_punch(NewPunch {
            employee_id: p.employee_id,
            kind: p.kind,
            timestamp: p.timestamp,
            geo: None,
        })
        .unwrap();
    }
    pool
}

fn assert_validation(result: Result<impl std::fmt::Debug, AppError>, needle: &str) {
    match result {
        Err(AppError::Validation(msg)) => assert!(msg.contains(needle), "unexpected message: {msg}"),
        other => panic!("expected validation error containing '{needle}', got {other:?}"),
    }
}

#[test]
fn test_validation_rejects_missing_fields() {
    let policy = AccountingPolicy::default();

    assert_validation(PayrollRequest::default().validate(&policy), "employee");

    let mut blank = march_request(20.0);
    blank.employee_id = Some("   ".into());
    assert_validation(blank.validate(&policy), "employee");

    let mut no_start = march_request(20.0);
    no_start.period_start = None;
    assert_validation(no_start.validate(&policy), "period start");

    let mut no_end = march_request(20.0);
    no_end.period_end = None;
    assert_validation(no_end.validate(&policy), "period end");

    let mut no_rate = march_request(20.0);
    no_rate.hourly_rate = None;
    assert_validation(no_rate.validate(&policy), "hourly rate");
}

#[test]
fn test_validation_rejects_inverted_period_and_bad_amounts() {
    let policy = AccountingPolicy::default();

    let inverted = PayrollRequest::new("ana", date(2025, 3, 31), date(2025, 3, 1), 20.0);
    assert_validation(inverted.validate(&policy), "after period end");

    assert_validation(march_request(-1.0).validate(&policy), "hourly rate");
    assert_validation(march_request(f64::NAN).validate(&policy), "hourly rate");
    assert_validation(
        march_request(20.0).with_deductions(f64::INFINITY).validate(&policy),
        "deductions",
    );
}

#[test]
fn test_negative_deductions_are_a_credit() {
    let policy = AccountingPolicy::default();
    let pool = seeded_pool();

    let request = march_request(20.0).with_deductions(-5.0);
    assert_eq!(request.validate(&policy).unwrap().deductions, -5.0);

    let period = Core::generate_payroll(&pool, &pool, &pool, &request, &policy).unwrap();
    assert_close(period.net_pay, (16.0 + 40.0 / 60.0) * 20.0 + 5.0);
}

#[test]
fn test_single_day_period_is_valid() {
    let policy = AccountingPolicy::default();
    let req = PayrollRequest::new("ana", date(2025, 3, 10), date(2025, 3, 10), 20.0);

    let valid = req.validate(&policy).unwrap();
    assert_eq!(valid.period_start, valid.period_end);
    assert_eq!(valid.deductions, 0.0);
}

#[test]
fn test_rate_falls_back_to_policy_default() {
    let policy = AccountingPolicy::default().with_default_hourly_rate(Some(20.0));
    let mut req = march_request(0.0);
    req.hourly_rate = None;

    assert_eq!(req.validate(&policy).unwrap().hourly_rate, 20.0);
}

#[test]
fn test_generate_totals_and_net_pay() {
    let policy = AccountingPolicy::default();
    let pool = seeded_pool();

    let request = march_request(20.0).with_deductions(10.0);
    let period = Core::generate_payroll(&pool, &pool, &pool, &request, &policy).unwrap();

    assert!(period.id > 0);
    assert_eq!(period.daily_breakdown.len(), 2);
    assert_close(period.total_hours, 16.0 + 40.0 / 60.0);
    assert_close(period.net_pay, (16.0 + 40.0 / 60.0) * 20.0 - 10.0);
    // no schedule: balance stays empty
    assert_eq!(period.total_overtime_hours, 0.0);
    assert_eq!(period.total_shortfall_hours, 0.0);
}

#[test]
fn test_regeneration_is_idempotent() {
    let policy = AccountingPolicy::default();
    let pool = seeded_pool();

    let first = Core::generate_payroll(&pool, &pool, &pool, &march_request(20.0), &policy).unwrap();
    let second = Core::generate_payroll(&pool, &pool, &pool, &march_request(20.0), &policy).unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(count_payroll_periods(&pool.conn, &first.key()).unwrap(), 1);
    assert_close(first.net_pay, second.net_pay);
}

#[test]
fn test_rate_correction_replaces_stored_record() {
    let policy = AccountingPolicy::default();
    let pool = seeded_pool();

    let first = Core::generate_payroll(&pool, &pool, &pool, &march_request(20.0), &policy).unwrap();
    let fixed = Core::generate_payroll(&pool, &pool, &pool, &march_request(25.0), &policy).unwrap();

    assert_eq!(first.id, fixed.id);

    let stored = pool.find_payroll_period(&first.key()).unwrap().unwrap();
    assert_eq!(stored.hourly_rate, 25.0);
    assert_close(stored.net_pay, (16.0 + 40.0 / 60.0) * 25.0);
    assert_eq!(stored.daily_breakdown, fixed.daily_breakdown);
    assert_eq!(pool.list_payroll_periods("ana").unwrap().len(), 1);
}

#[test]
fn test_distinct_periods_are_distinct_records() {
    let policy = AccountingPolicy::default();
    let pool = seeded_pool();

    let march = Core::generate_payroll(&pool, &pool, &pool, &march_request(20.0), &policy).unwrap();
    let one_day = PayrollRequest::new("ana", date(2025, 3, 10), date(2025, 3, 10), 20.0);
    let day = Core::generate_payroll(&pool, &pool, &pool, &one_day, &policy).unwrap();

    assert_ne!(march.id, day.id);
    assert_close(day.total_hours, 8.0 + 40.0 / 60.0);
    assert_eq!(pool.list_payroll_periods("ana").unwrap().len(), 2);
}

#[test]
fn test_schedule_fills_overtime_and_shortfall() {
    let policy = AccountingPolicy::default();
    let pool = seeded_pool();
    save_schedule(&pool.conn, "ana", &ScheduleExpectation::new(hm(8, 0), hm(17, 0), 60)).unwrap();

    let period = Core::generate_payroll(&pool, &pool, &pool, &march_request(20.0), &policy).unwrap();

    // load 8h: +40min on the 10th, exactly 8h on the 11th
    let tenth = &period.daily_breakdown[0];
    assert_close(tenth.overtime_hours, 40.0 / 60.0);
    assert_eq!(tenth.shortfall_hours, 0.0);
    assert_close(period.total_overtime_hours, 40.0 / 60.0);
    assert_close(period.total_shortfall_hours, 0.0);
    // overtime does not change net pay
    assert_close(period.net_pay, (16.0 + 40.0 / 60.0) * 20.0);
}

#[test]
fn test_empty_period_is_stored_with_zero_totals() {
    let policy = AccountingPolicy::default();
    let pool = DbPool::in_memory().unwrap();

    let period = Core::generate_payroll(&pool, &pool, &pool, &march_request(20.0), &policy).unwrap();

    assert!(period.daily_breakdown.is_empty());
    assert_eq!(period.total_hours, 0.0);
    assert_eq!(period.net_pay, 0.0);
}

#[test]
fn test_build_period_is_pure() {
    let policy = AccountingPolicy::default();
    let valid = march_request(10.0).validate(&policy).unwrap();
    let punches = day_punches(1, "ana", "2025-03-10", ["08:00", "12:00", "13:00", "17:00"]);

    let period = PayrollLogic::build_period(&valid, &punches, None, &policy, Utc::now()).unwrap();

    assert_eq!(period.id, 0);
    assert_close(period.total_hours, 8.0);
    assert_close(period.net_pay, 80.0);
}

#[test]
fn test_month_bounds() {
    assert_eq!(month_bounds(2024, 2).unwrap(), (date(2024, 2, 1), date(2024, 2, 29)));
    assert_eq!(month_bounds(2025, 12).unwrap(), (date(2025, 12, 1), date(2025, 12, 31)));
    assert!(month_bounds(2025, 13).is_err());
}

#[test]
fn test_refresh_month_keeps_rate_and_deductions() {
    let policy = AccountingPolicy::default();
    let pool = seeded_pool();

    let first = Core::generate_payroll(
        &pool,
        &pool,
        &pool,
        &march_request(20.0).with_deductions(10.0),
        &policy,
    )
    .unwrap();

    for (kind, t) in [(PunchKind::Entry, "08:00"), (PunchKind::Exit, "10:00")] {
        pool.record_punch(NewPunch {
            employee_id: "ana".into(),
            kind,
            timestamp: brt("2025-03-12", t),
            geo: None,
        })
        .unwrap();
    }

    let refreshed = Core::refresh_month_payroll(&pool, &pool, &pool, "ana", date(2025, 3, 12), &policy)
        .unwrap()
        .expect("March period is stored");

    assert_eq!(refreshed.id, first.id);
    assert_eq!(refreshed.hourly_rate, 20.0);
    assert_eq!(refreshed.deductions, 10.0);
    assert_eq!(refreshed.daily_breakdown.len(), 3);
    assert_close(refreshed.total_hours, first.total_hours + 2.0);
    assert_close(refreshed.net_pay, (first.total_hours + 2.0) * 20.0 - 10.0);
}

#[test]
fn test_refresh_month_without_stored_period_is_noop() {
    let policy = AccountingPolicy::default();
    let pool = seeded_pool();

    let refreshed =
        Core::refresh_month_payroll(&pool, &pool, &pool, "ana", date(2025, 4, 1), &policy).unwrap();
    assert!(refreshed.is_none());
    assert!(pool.list_payroll_periods("ana").unwrap().is_empty());
}
