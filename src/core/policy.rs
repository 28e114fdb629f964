//! Accounting knobs that used to be hidden literals: day-boundary offset,
//! lunch cap, default lunch allowance, hourly-rate fallback.

use crate::core::calculator::hours::HoursPolicy;
use crate::errors::{AppError, AppResult};
use chrono::{Duration, FixedOffset, Offset, Utc};

/// Widest offset accepted (±18 h), in minutes.
const MAX_OFFSET_MINUTES: i32 = 18 * 60;

pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = -180;
pub const DEFAULT_LUNCH_CAP_MINUTES: u32 = 60;
pub const DEFAULT_LUNCH_MINUTES: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccountingPolicy {
    /// Employee-local day boundary.
    pub offset: FixedOffset,
    pub hours: HoursPolicy,
    /// Lunch allowance when the schedule does not state one.
    pub default_lunch_minutes: u32,
    /// Rate used when a payroll request carries none. Unset means the
    /// request is rejected.
    pub default_hourly_rate: Option<f64>,
}

impl Default for AccountingPolicy {
    fn default() -> Self {
        Self {
            offset: FixedOffset::east_opt(DEFAULT_UTC_OFFSET_MINUTES * 60)
                .unwrap_or_else(|| Utc.fix()),
            hours: HoursPolicy::default(),
            default_lunch_minutes: DEFAULT_LUNCH_MINUTES,
            default_hourly_rate: None,
        }
    }
}

impl AccountingPolicy {
    pub fn with_offset_minutes(mut self, minutes: i32) -> AppResult<Self> {
        self.offset = offset_from_minutes(minutes)?;
        Ok(self)
    }

    pub fn with_lunch_cap_minutes(mut self, minutes: u32) -> Self {
        self.hours.lunch_cap = Duration::minutes(i64::from(minutes));
        self
    }

    pub fn with_default_lunch_minutes(mut self, minutes: u32) -> Self {
        self.default_lunch_minutes = minutes;
        self
    }

    pub fn with_default_hourly_rate(mut self, rate: Option<f64>) -> Self {
        self.default_hourly_rate = rate;
        self
    }
}

pub fn offset_from_minutes(minutes: i32) -> AppResult<FixedOffset> {
    if minutes.abs() > MAX_OFFSET_MINUTES {
        return Err(AppError::Config(format!(
            "utc_offset_minutes out of range: {minutes}"
        )));
    }
    FixedOffset::east_opt(minutes * 60)
        .ok_or_else(|| AppError::Config(format!("invalid utc offset: {minutes} minutes")))
}
