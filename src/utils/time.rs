//! Time utilities: parsing HH:MM and punch instants, duration helpers.

use crate::core::calculator::day::local_day;
use crate::errors::{AppError, AppResult};
use crate::models::range::local_instant;
use chrono::{DateTime, FixedOffset, NaiveDateTime, NaiveTime, Utc};

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t.trim(), "%H:%M").ok()
}

pub fn parse_optional_time(input: Option<&String>) -> AppResult<Option<NaiveTime>> {
    if let Some(s) = input {
        let t = parse_time(s).ok_or_else(|| AppError::InvalidTime(s.to_string()))?;
        Ok(Some(t))
    } else {
        Ok(None)
    }
}

/// Parse a punch instant. Accepted forms:
/// - RFC 3339 with an explicit offset (`2025-03-10T08:00:00-03:00`)
/// - `YYYY-MM-DD HH:MM[:SS]` or `YYYY-MM-DDTHH:MM[:SS]`, employee-local
/// - `HH:MM`, employee-local, on the local day of `now`
pub fn parse_instant(s: &str, offset: FixedOffset, now: DateTime<Utc>) -> AppResult<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return local_instant(naive.date(), naive.time(), offset);
        }
    }

    if let Some(t) = parse_time(s) {
        return local_instant(local_day(now, offset), t, offset);
    }

    Err(AppError::InvalidTime(s.to_string()))
}

/// Render an instant in the employee-local offset, `HH:MM`.
pub fn local_hhmm(ts: &DateTime<Utc>, offset: FixedOffset) -> String {
    ts.with_timezone(&offset).format("%H:%M").to_string()
}

pub fn optional_local_hhmm(ts: Option<DateTime<Utc>>, offset: FixedOffset) -> String {
    ts.map(|t| local_hhmm(&t, offset))
        .unwrap_or_else(|| "--:--".to_string())
}
