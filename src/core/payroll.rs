//! Payroll period generation: validate, aggregate, upsert.

use crate::core::calculator::balance::{apply_balance, daily_load_hours};
use crate::core::logic::Core;
use crate::core::policy::AccountingPolicy;
use crate::core::sources::{PayrollStore, PunchSource, ScheduleSource};
use crate::errors::{AppError, AppResult};
use crate::models::payroll::{PayrollKey, PayrollPeriod};
use crate::models::punch::PunchEvent;
use crate::models::range::TimeRange;
use crate::models::schedule::ScheduleExpectation;
use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// Raw payroll input as it arrives from a caller. Fields are optional so
/// that absence is reported as a validation error instead of being
/// impossible to express.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PayrollRequest {
    pub employee_id: Option<String>,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    pub hourly_rate: Option<f64>,
    pub deductions: Option<f64>,
}

impl PayrollRequest {
    pub fn new(employee_id: &str, start: NaiveDate, end: NaiveDate, hourly_rate: f64) -> Self {
        Self {
            employee_id: Some(employee_id.to_string()),
            period_start: Some(start),
            period_end: Some(end),
            hourly_rate: Some(hourly_rate),
            deductions: None,
        }
    }

    pub fn with_deductions(mut self, deductions: f64) -> Self {
        self.deductions = Some(deductions);
        self
    }

    /// Check every required field. The rate falls back to
    /// `policy.default_hourly_rate` when the request has none.
    pub fn validate(&self, policy: &AccountingPolicy) -> AppResult<ValidPayrollRequest> {
        let employee_id = self
            .employee_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::validation("employee id is required"))?;

        let start = self
            .period_start
            .ok_or_else(|| AppError::validation("period start is required"))?;
        let end = self
            .period_end
            .ok_or_else(|| AppError::validation("period end is required"))?;

        if start > end {
            return Err(AppError::validation(format!(
                "period start {start} is after period end {end}"
            )));
        }

        let hourly_rate = self
            .hourly_rate
            .or(policy.default_hourly_rate)
            .ok_or_else(|| AppError::validation("hourly rate is required"))?;
        if !hourly_rate.is_finite() || hourly_rate < 0.0 {
            return Err(AppError::validation(format!(
                "hourly rate must be a non-negative number, got {hourly_rate}"
            )));
        }

        // Negative deductions are a credit added to the net pay.
        let deductions = self.deductions.unwrap_or(0.0);
        if !deductions.is_finite() {
            return Err(AppError::validation(format!(
                "deductions must be a number, got {deductions}"
            )));
        }

        Ok(ValidPayrollRequest {
            employee_id: employee_id.to_string(),
            period_start: start,
            period_end: end,
            hourly_rate,
            deductions,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidPayrollRequest {
    pub employee_id: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub hourly_rate: f64,
    pub deductions: f64,
}

impl ValidPayrollRequest {
    /// Whole local days of the period.
    pub fn range(&self, policy: &AccountingPolicy) -> AppResult<TimeRange> {
        TimeRange::local_days(self.period_start, self.period_end, policy.offset)
    }
}

pub struct PayrollLogic;

impl PayrollLogic {
    /// Aggregate `punches` into an unsaved `PayrollPeriod` (id 0).
    ///
    /// `net_pay = total_hours * hourly_rate - deductions`. Overtime and
    /// shortfall are informational and only filled when `schedule` has both
    /// expected times.
    pub fn build_period(
        request: &ValidPayrollRequest,
        punches: &[PunchEvent],
        schedule: Option<&ScheduleExpectation>,
        policy: &AccountingPolicy,
        generated_at: DateTime<Utc>,
    ) -> AppResult<PayrollPeriod> {
        let range = request.range(policy)?;
        let days = Core::build_day_sessions(punches, &request.employee_id, &range, policy);

        let load = schedule
            .and_then(|s| daily_load_hours(s, &policy.hours, policy.default_lunch_minutes));

        let mut daily_breakdown = Vec::with_capacity(days.len());
        for (_, mut session) in days {
            if let Some(load_hours) = load {
                apply_balance(&mut session, load_hours);
            }
            daily_breakdown.push(session);
        }

        let total_hours: f64 = daily_breakdown.iter().map(|d| d.worked_hours).sum();
        let total_overtime_hours: f64 = daily_breakdown.iter().map(|d| d.overtime_hours).sum();
        let total_shortfall_hours: f64 = daily_breakdown.iter().map(|d| d.shortfall_hours).sum();
        let net_pay = total_hours * request.hourly_rate - request.deductions;

        Ok(PayrollPeriod {
            id: 0,
            employee_id: request.employee_id.clone(),
            period_start: request.period_start,
            period_end: request.period_end,
            hourly_rate: request.hourly_rate,
            deductions: request.deductions,
            total_hours,
            total_overtime_hours,
            total_shortfall_hours,
            net_pay,
            daily_breakdown,
            generated_at,
        })
    }

    /// Validate, fetch, aggregate and upsert. Regenerating the same key
    /// (for instance with a corrected rate) replaces the stored record.
    pub fn generate<P, S, W>(
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
        let valid = request.validate(policy)?;
        let range = valid.range(policy)?;

        let fetched = punches.fetch_punches(&valid.employee_id, &range)?;
        let schedule = schedules.fetch_schedule(&valid.employee_id)?;

        tracing::debug!(
            employee = %valid.employee_id,
            start = %valid.period_start,
            end = %valid.period_end,
            punches = fetched.len(),
            "generating payroll period"
        );

        let period = Self::build_period(&valid, &fetched, schedule.as_ref(), policy, Utc::now())?;
        let stored = store.upsert_payroll_period(period)?;

        tracing::debug!(id = stored.id, net_pay = stored.net_pay, "payroll period stored");
        Ok(stored)
    }

    /// Regenerate the stored period of the calendar month containing `day`,
    /// keeping its rate and deductions. `None` when that month has no
    /// stored period yet.
    pub fn refresh_month<P, S, W>(
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
        let (start, end) = month_of(day)?;
        let key = PayrollKey {
            employee_id: employee_id.to_string(),
            period_start: start,
            period_end: end,
        };

        let Some(stored) = store.find_payroll_period(&key)? else {
            return Ok(None);
        };

        let request = PayrollRequest::new(employee_id, start, end, stored.hourly_rate)
            .with_deductions(stored.deductions);
        Self::generate(punches, schedules, store, &request, policy).map(Some)
    }
}

/// First and last day of a calendar month.
pub fn month_bounds(year: i32, month: u32) -> AppResult<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::InvalidDate(format!("{year}-{month:02}")))?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| AppError::InvalidDate(format!("{year}-{month:02}")))?;

    let last = next
        .pred_opt()
        .ok_or_else(|| AppError::InvalidDate(format!("{year}-{month:02}")))?;
    Ok((first, last))
}

/// Month bounds of the month containing `day`.
pub fn month_of(day: NaiveDate) -> AppResult<(NaiveDate, NaiveDate)> {
    month_bounds(day.year(), day.month())
}
