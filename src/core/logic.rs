use crate::core::calculator::day::{DayAggregator, local_day};
use crate::core::calculator::hours::HoursCalculator;
use crate::core::live_status::{LiveStatusEngine, PunchState};
use crate::core::payroll::{PayrollLogic, PayrollRequest};
use crate::core::policy::AccountingPolicy;
use crate::core::sources::{PayrollStore, PunchSource, ScheduleSource};
use crate::errors::AppResult;
use crate::models::day_session::DaySession;
use crate::models::payroll::PayrollPeriod;
use crate::models::punch::PunchEvent;
use crate::models::range::TimeRange;
use crate::models::schedule::ScheduleExpectation;
use crate::models::status::StatusFrame;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;

/// Entry points exposed to request handlers (CLI, or any other front end).
pub struct Core;

impl Core {
    /// Group `punches` into local days and fill the worked hours.
    /// Integrity findings are logged and kept on each session.
    pub fn build_day_sessions(
        punches: &[PunchEvent],
        employee_id: &str,
        range: &TimeRange,
        policy: &AccountingPolicy,
    ) -> BTreeMap<NaiveDate, DaySession> {
        let aggregator = DayAggregator::new(policy.offset);
        let calculator = HoursCalculator::new(policy.hours);

        let mut days = aggregator.aggregate(punches, employee_id, range);
        for session in days.values_mut() {
            calculator.apply(session);
            for w in &session.warnings {
                tracing::warn!(employee = employee_id, "{}", w);
            }
        }
        days
    }

    pub fn compute_day_sessions<P: PunchSource + ?Sized>(
        source: &P,
        employee_id: &str,
        range: &TimeRange,
        policy: &AccountingPolicy,
    ) -> AppResult<BTreeMap<NaiveDate, DaySession>> {
        let punches = source.fetch_punches(employee_id, range)?;
        tracing::debug!(
            employee = employee_id,
            punches = punches.len(),
            "computing day sessions"
        );
        Ok(Self::build_day_sessions(&punches, employee_id, range, policy))
    }

    pub fn generate_payroll<P, S, W>(
        punches: &P,
        schedules: &S,
        store: &W,
        request: &PayrollRequest,
        policy: &AccountingPolicy,
    ) -> AppResult<PayrollPeriod>
    where
        P: PunchSource + ?Sized,
        S: ScheduleSource + ?Sized,
        W: PayrollStore + ?Sized,
    {
        PayrollLogic::generate(punches, schedules, store, request, policy)
    }

    pub fn refresh_month_payroll<P, S, W>(
        punches: &P,
        schedules: &S,
        store: &W,
        employee_id: &str,
        day: NaiveDate,
        policy: &AccountingPolicy,
    ) -> AppResult<Option<PayrollPeriod>>
    where
        P: PunchSource + ?Sized,
        S: ScheduleSource + ?Sized,
        W: PayrollStore + ?Sized,
    {
        PayrollLogic::refresh_month(punches, schedules, store, employee_id, day, policy)
    }

    pub fn evaluate_live_status(
        schedule: &ScheduleExpectation,
        punches: &PunchState,
        now: DateTime<Utc>,
        policy: &AccountingPolicy,
    ) -> StatusFrame {
        LiveStatusEngine::from_policy(policy).evaluate(schedule, punches, now)
    }

    /// Punch slots of the workday in progress at `now`.
    ///
    /// Normally the local day containing `now`. With an overnight schedule
    /// and no entry yet today, a shift opened yesterday and not exited is
    /// still running: its entry is kept and the punches made after
    /// midnight are merged in.
    pub fn todays_punch_state<P: PunchSource + ?Sized>(
        source: &P,
        employee_id: &str,
        schedule: &ScheduleExpectation,
        now: DateTime<Utc>,
        policy: &AccountingPolicy,
    ) -> AppResult<PunchState> {
        let today = local_day(now, policy.offset);
        let yesterday = today.pred_opt().unwrap_or(today);
        let first = if schedule.is_overnight() { yesterday } else { today };

        let range = TimeRange::local_days(first, today, policy.offset)?;
        let days = Self::compute_day_sessions(source, employee_id, &range, policy)?;
        let current = days.get(&today).map(PunchState::from).unwrap_or_default();

        if current.entry.is_some() || first == today {
            return Ok(current);
        }

        match days.get(&yesterday).map(PunchState::from) {
            Some(open) if open.entry.is_some() && open.exit.is_none() => {
                tracing::debug!(
                    employee = employee_id,
                    entry_day = %yesterday,
                    "continuing overnight shift"
                );
                Ok(PunchState {
                    entry: open.entry,
                    lunch_out: current.lunch_out.or(open.lunch_out),
                    lunch_return: current.lunch_return.or(open.lunch_return),
                    exit: current.exit,
                })
            }
            _ => Ok(current),
        }
    }
}
