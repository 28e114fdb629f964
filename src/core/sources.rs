//! Contracts of the external collaborators the core consumes.
//!
//! The SQLite implementation lives in `db::pool`; anything else (a remote
//! API, a test double) only has to implement these traits.

use crate::errors::AppResult;
use crate::models::payroll::{PayrollKey, PayrollPeriod};
use crate::models::punch::{NewPunch, PunchEvent};
use crate::models::range::TimeRange;
use crate::models::schedule::ScheduleExpectation;

pub trait PunchSource {
    /// Punches of `employee_id` within `range`. Order is not guaranteed.
    fn fetch_punches(&self, employee_id: &str, range: &TimeRange) -> AppResult<Vec<PunchEvent>>;
}

pub trait ScheduleSource {
    /// `None` when the employee has no schedule at all.
    fn fetch_schedule(&self, employee_id: &str) -> AppResult<Option<ScheduleExpectation>>;
}

pub trait PayrollStore {
    /// Atomic find-or-create-then-replace keyed by
    /// `(employee_id, period_start, period_end)`. Returns the stored record,
    /// carrying the id of the existing row when one was replaced.
    fn upsert_payroll_period(&self, record: PayrollPeriod) -> AppResult<PayrollPeriod>;

    fn find_payroll_period(&self, key: &PayrollKey) -> AppResult<Option<PayrollPeriod>>;

    fn list_payroll_periods(&self, employee_id: &str) -> AppResult<Vec<PayrollPeriod>>;
}

pub trait PunchRecorder {
    fn record_punch(&self, punch: NewPunch) -> AppResult<PunchEvent>;
}
