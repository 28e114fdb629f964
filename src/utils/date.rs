use crate::core::calculator::day::local_day;
use crate::core::payroll::month_bounds;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// `YYYY-MM` → (first day, last day)
pub fn parse_month(s: &str) -> Result<(NaiveDate, NaiveDate), String> {
    let (y, m) = s
        .trim()
        .split_once('-')
        .ok_or_else(|| format!("Invalid month: {}", s))?;
    let year: i32 = y.parse().map_err(|_| format!("Invalid month: {}", s))?;
    let month: u32 = m.parse().map_err(|_| format!("Invalid month: {}", s))?;
    month_bounds(year, month).map_err(|_| format!("Invalid month: {}", s))
}

/// A single period expression → (first day, last day):
/// `YYYY-MM-DD`, `YYYY-MM` or `YYYY`.
pub fn bounds_from_period(p: &str) -> Result<(NaiveDate, NaiveDate), String> {
    if let Some(d) = parse_date(p) {
        return Ok((d, d));
    }

    if let Ok(bounds) = parse_month(p) {
        return Ok(bounds);
    }

    if let Ok(year) = p.trim().parse::<i32>() {
        let first = NaiveDate::from_ymd_opt(year, 1, 1);
        let last = NaiveDate::from_ymd_opt(year, 12, 31);
        if let (Some(first), Some(last)) = (first, last) {
            return Ok((first, last));
        }
    }

    Err(format!("Invalid period: {}", p))
}

/// Period expression with optional range: `P` or `P1:P2`.
pub fn resolve_period(p: &str) -> Result<(NaiveDate, NaiveDate), String> {
    if let Some((a, b)) = p.split_once(':') {
        let (start, _) = bounds_from_period(a)?;
        let (_, end) = bounds_from_period(b)?;
        if start > end {
            return Err(format!("Invalid period: {} (start after end)", p));
        }
        return Ok((start, end));
    }
    bounds_from_period(p)
}

/// Current local month of `now`.
pub fn current_month(now: DateTime<Utc>, offset: FixedOffset) -> Result<(NaiveDate, NaiveDate), String> {
    let d = local_day(now, offset);
    crate::core::payroll::month_of(d).map_err(|e| e.to_string())
}
