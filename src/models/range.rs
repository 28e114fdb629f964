use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

/// Inclusive instant window `[from, to]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> AppResult<Self> {
        if from > to {
            return Err(AppError::validation(format!(
                "range start {} is after range end {}",
                from.to_rfc3339(),
                to.to_rfc3339()
            )));
        }
        Ok(Self { from, to })
    }

    /// Whole employee-local days `first ..= last` in the given offset.
    pub fn local_days(first: NaiveDate, last: NaiveDate, offset: FixedOffset) -> AppResult<Self> {
        let from = local_midnight(first, offset)?;
        let to = local_midnight(last, offset)? + Duration::days(1) - Duration::milliseconds(1);
        Self::new(from, to)
    }

    pub fn contains(&self, ts: &DateTime<Utc>) -> bool {
        *ts >= self.from && *ts <= self.to
    }
}

/// The UTC instant of 00:00 on `day` at `offset`.
pub fn local_midnight(day: NaiveDate, offset: FixedOffset) -> AppResult<DateTime<Utc>> {
    local_instant(day, NaiveTime::MIN, offset)
}

/// The UTC instant of `time` on `day` at `offset`.
pub fn local_instant(
    day: NaiveDate,
    time: NaiveTime,
    offset: FixedOffset,
) -> AppResult<DateTime<Utc>> {
    day.and_time(time)
        .and_local_timezone(offset)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| AppError::InvalidDate(format!("{day} {time} at {offset}")))
}
