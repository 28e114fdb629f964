use crate::errors::{AppError, AppResult};
use crate::models::day_session::DaySession;
use crate::models::payroll::{PayrollKey, PayrollPeriod};
use crate::models::punch::{GeoPoint, NewPunch, PunchEvent};
use crate::models::punch_kind::PunchKind;
use crate::models::range::TimeRange;
use crate::models::schedule::ScheduleExpectation;
use chrono::{DateTime, Local, NaiveDate, NaiveTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

/// Instants are stored as fixed-width UTC RFC 3339 text
/// (`2025-03-10T11:00:00.000Z`) so that string order is time order.
pub fn ts_to_db(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn conversion_error(col: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(col, rusqlite::types::Type::Text, Box::new(err))
}

fn ts_from_db(col: usize, s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| conversion_error(col, AppError::InvalidDate(s.to_string())))
}

fn date_from_db(col: usize, s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| conversion_error(col, AppError::InvalidDate(s.to_string())))
}

fn time_from_db(col: usize, s: Option<String>) -> Result<Option<NaiveTime>> {
    match s {
        None => Ok(None),
        Some(s) => NaiveTime::parse_from_str(&s, "%H:%M")
            .map(Some)
            .map_err(|_| conversion_error(col, AppError::InvalidTime(s))),
    }
}

// ---------------------------------------------------------------------------
// Punches
// ---------------------------------------------------------------------------

pub fn map_punch_row(row: &Row) -> Result<PunchEvent> {
    let kind_str: String = row.get("kind")?;
    let kind = PunchKind::from_db_str(&kind_str)
        .ok_or_else(|| conversion_error(2, AppError::InvalidPunchKind(kind_str.clone())))?;

    let ts_str: String = row.get("ts")?;
    let timestamp = ts_from_db(3, &ts_str)?;

    let lat: Option<f64> = row.get("lat")?;
    let lon: Option<f64> = row.get("lon")?;
    let geo = match (lat, lon) {
        (Some(lat), Some(lon)) => Some(GeoPoint { lat, lon }),
        _ => None,
    };

    Ok(PunchEvent {
        id: row.get("id")?,
        employee_id: row.get("employee_id")?,
        kind,
        timestamp,
        geo,
    })
}

/// The returned event carries the stored (millisecond) timestamp.
pub fn insert_punch(conn: &Connection, punch: &NewPunch) -> AppResult<PunchEvent> {
    let timestamp = punch.timestamp.trunc_subsecs(3);
    conn.execute(
        "INSERT INTO punches (employee_id, kind, ts, lat, lon, source, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, 'cli', ?6)",
        params![
            punch.employee_id,
            punch.kind.to_db_str(),
            ts_to_db(&timestamp),
            punch.geo.map(|g| g.lat),
            punch.geo.map(|g| g.lon),
            Local::now().to_rfc3339(),
        ],
    )?;

    Ok(PunchEvent {
        id: conn.last_insert_rowid(),
        employee_id: punch.employee_id.clone(),
        kind: punch.kind,
        timestamp,
        geo: punch.geo,
    })
}

pub fn load_punches_in_range(
    conn: &Connection,
    employee_id: &str,
    range: &TimeRange,
) -> AppResult<Vec<PunchEvent>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, employee_id, kind, ts, lat, lon FROM punches
         WHERE employee_id = ?1 AND ts >= ?2 AND ts <= ?3
         ORDER BY ts ASC, id ASC",
    )?;

    let rows = stmt.query_map(
        params![employee_id, ts_to_db(&range.from), ts_to_db(&range.to)],
        map_punch_row,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Schedules
// ---------------------------------------------------------------------------

pub fn load_schedule(conn: &Connection, employee_id: &str) -> AppResult<Option<ScheduleExpectation>> {
    let row = conn
        .query_row(
            "SELECT expected_entry, expected_exit, lunch_minutes
             FROM schedules WHERE employee_id = ?1",
            [employee_id],
            |row| {
                Ok(ScheduleExpectation {
                    expected_entry: time_from_db(0, row.get(0)?)?,
                    expected_exit: time_from_db(1, row.get(1)?)?,
                    lunch_duration_minutes: row.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(row)
}

pub fn save_schedule(
    conn: &Connection,
    employee_id: &str,
    schedule: &ScheduleExpectation,
) -> AppResult<()> {
    conn.execute(
        "INSERT INTO schedules (employee_id, expected_entry, expected_exit, lunch_minutes, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(employee_id) DO UPDATE SET
             expected_entry = excluded.expected_entry,
             expected_exit  = excluded.expected_exit,
             lunch_minutes  = excluded.lunch_minutes,
             updated_at     = excluded.updated_at",
        params![
            employee_id,
            schedule
                .expected_entry
                .map(|t| t.format("%H:%M").to_string()),
            schedule.expected_exit.map(|t| t.format("%H:%M").to_string()),
            schedule.lunch_duration_minutes,
            Local::now().to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn delete_schedule(conn: &Connection, employee_id: &str) -> AppResult<bool> {
    let n = conn.execute("DELETE FROM schedules WHERE employee_id = ?1", [employee_id])?;
    Ok(n > 0)
}

// ---------------------------------------------------------------------------
// Payroll periods
// ---------------------------------------------------------------------------

const PAYROLL_COLUMNS: &str = "id, employee_id, period_start, period_end, hourly_rate, deductions,
     total_hours, total_overtime_hours, total_shortfall_hours, net_pay,
     daily_breakdown, generated_at";

pub fn map_payroll_row(row: &Row) -> Result<PayrollPeriod> {
    let start: String = row.get("period_start")?;
    let end: String = row.get("period_end")?;
    let breakdown: String = row.get("daily_breakdown")?;
    let generated: String = row.get("generated_at")?;

    let daily_breakdown: Vec<DaySession> = serde_json::from_str(&breakdown)
        .map_err(|e| conversion_error(10, AppError::Json(e)))?;

    Ok(PayrollPeriod {
        id: row.get("id")?,
        employee_id: row.get("employee_id")?,
        period_start: date_from_db(2, &start)?,
        period_end: date_from_db(3, &end)?,
        hourly_rate: row.get("hourly_rate")?,
        deductions: row.get("deductions")?,
        total_hours: row.get("total_hours")?,
        total_overtime_hours: row.get("total_overtime_hours")?,
        total_shortfall_hours: row.get("total_shortfall_hours")?,
        net_pay: row.get("net_pay")?,
        daily_breakdown,
        generated_at: ts_from_db(11, &generated)?,
    })
}

/// Single-statement conditional upsert on the payroll key. Concurrent
/// callers for the same key end up with one row; the row id survives
/// regeneration.
pub fn upsert_payroll_period(conn: &Connection, mut record: PayrollPeriod) -> AppResult<PayrollPeriod> {
    let breakdown = serde_json::to_string(&record.daily_breakdown)?;

    let id: i64 = conn.query_row(
        "INSERT INTO payroll_periods (
             employee_id, period_start, period_end, hourly_rate, deductions,
             total_hours, total_overtime_hours, total_shortfall_hours, net_pay,
             daily_breakdown, generated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
         ON CONFLICT(employee_id, period_start, period_end) DO UPDATE SET
             hourly_rate           = excluded.hourly_rate,
             deductions            = excluded.deductions,
             total_hours           = excluded.total_hours,
             total_overtime_hours  = excluded.total_overtime_hours,
             total_shortfall_hours = excluded.total_shortfall_hours,
             net_pay               = excluded.net_pay,
             daily_breakdown       = excluded.daily_breakdown,
             generated_at          = excluded.generated_at
         RETURNING id",
        params![
            record.employee_id,
            record.period_start.format("%Y-%m-%d").to_string(),
            record.period_end.format("%Y-%m-%d").to_string(),
            record.hourly_rate,
            record.deductions,
            record.total_hours,
            record.total_overtime_hours,
            record.total_shortfall_hours,
            record.net_pay,
            breakdown,
            ts_to_db(&record.generated_at),
        ],
        |row| row.get(0),
    )?;

    record.id = id;
    Ok(record)
}

pub fn find_payroll_period(conn: &Connection, key: &PayrollKey) -> AppResult<Option<PayrollPeriod>> {
    let sql = format!(
        "SELECT {PAYROLL_COLUMNS} FROM payroll_periods
         WHERE employee_id = ?1 AND period_start = ?2 AND period_end = ?3"
    );
    let found = conn
        .query_row(
            &sql,
            params![
                key.employee_id,
                key.period_start.format("%Y-%m-%d").to_string(),
                key.period_end.format("%Y-%m-%d").to_string(),
            ],
            map_payroll_row,
        )
        .optional()?;
    Ok(found)
}

pub fn list_payroll_periods(conn: &Connection, employee_id: &str) -> AppResult<Vec<PayrollPeriod>> {
    let sql = format!(
        "SELECT {PAYROLL_COLUMNS} FROM payroll_periods
         WHERE employee_id = ?1
         ORDER BY period_start DESC, period_end DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([employee_id], map_payroll_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn count_payroll_periods(conn: &Connection, key: &PayrollKey) -> AppResult<i64> {
    let n = conn.query_row(
        "SELECT COUNT(*) FROM payroll_periods
         WHERE employee_id = ?1 AND period_start = ?2 AND period_end = ?3",
        params![
            key.employee_id,
            key.period_start.format("%Y-%m-%d").to_string(),
            key.period_end.format("%Y-%m-%d").to_string(),
        ],
        |row| row.get(0),
    )?;
    Ok(n)
}
