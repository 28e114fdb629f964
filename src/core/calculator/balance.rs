//! Overtime / shortfall of a day against the scheduled daily load.

use crate::core::calculator::hours::{HoursPolicy, duration_hours};
use crate::models::day_session::DaySession;
use crate::models::schedule::ScheduleExpectation;
use chrono::Duration;

/// Hours the schedule expects per day, lunch excluded. `None` unless both
/// expected times are set.
pub fn daily_load_hours(
    schedule: &ScheduleExpectation,
    policy: &HoursPolicy,
    default_lunch_minutes: u32,
) -> Option<f64> {
    let entry = schedule.expected_entry?;
    let exit = schedule.expected_exit?;

    let mut span = exit - entry;
    if span <= Duration::zero() {
        // overnight shift
        span += Duration::days(1);
    }

    let lunch_minutes = schedule
        .lunch_duration_minutes
        .unwrap_or(default_lunch_minutes);
    let lunch = Duration::minutes(i64::from(lunch_minutes)).min(policy.lunch_cap);

    Some(duration_hours(span - lunch).max(0.0))
}

/// Set `overtime_hours` / `shortfall_hours` from `worked_hours`.
pub fn apply_balance(session: &mut DaySession, load_hours: f64) {
    let diff = session.worked_hours - load_hours;
    if diff > 0.0 {
        session.overtime_hours = diff;
        session.shortfall_hours = 0.0;
    } else {
        session.overtime_hours = 0.0;
        session.shortfall_hours = -diff;
    }
}
