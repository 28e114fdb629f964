use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, OptionalExtension, Result};

/// Versioned schema steps. Each one runs once and is recorded in the `log`
/// table as `migration_applied`.
const MIGRATIONS: &[(&str, &str, &str)] = &[
    (
        "20250301_0001_create_punches",
        "Created punches table",
        r#"
        CREATE TABLE IF NOT EXISTS punches (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_id  TEXT NOT NULL,
            kind         TEXT NOT NULL CHECK(kind IN ('entry','lunch_out','lunch_return','exit')),
            ts           TEXT NOT NULL,
            lat          REAL,
            lon          REAL,
            source       TEXT NOT NULL DEFAULT 'cli',
            created_at   TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_punches_employee_ts ON punches(employee_id, ts);
        "#,
    ),
    (
        "20250301_0002_create_schedules",
        "Created schedules table",
        r#"
        CREATE TABLE IF NOT EXISTS schedules (
            employee_id     TEXT PRIMARY KEY,
            expected_entry  TEXT,
            expected_exit   TEXT,
            lunch_minutes   INTEGER CHECK(lunch_minutes IS NULL OR lunch_minutes >= 0),
            updated_at      TEXT NOT NULL
        );
        "#,
    ),
    (
        "20250301_0003_create_payroll_periods",
        "Created payroll_periods table",
        r#"
        CREATE TABLE IF NOT EXISTS payroll_periods (
            id                     INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_id            TEXT NOT NULL,
            period_start           TEXT NOT NULL,
            period_end             TEXT NOT NULL,
            hourly_rate            REAL NOT NULL,
            deductions             REAL NOT NULL DEFAULT 0,
            total_hours            REAL NOT NULL DEFAULT 0,
            total_overtime_hours   REAL NOT NULL DEFAULT 0,
            total_shortfall_hours  REAL NOT NULL DEFAULT 0,
            net_pay                REAL NOT NULL DEFAULT 0,
            daily_breakdown        TEXT NOT NULL DEFAULT '[]',
            generated_at           TEXT NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_payroll_key
            ON payroll_periods(employee_id, period_start, period_end);
        "#,
    ),
];

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, version: &str, description: &str, sql: &str) -> AppResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(sql)
        .map_err(|e| AppError::Migration(format!("{version}: {e}")))?;

    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, description],
    )?;

    tx.commit()?;
    tracing::info!(version, "migration applied");
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::init_db(). Returns the versions applied by this call,
/// empty when the schema was already current.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<Vec<&'static str>> {
    ensure_log_table(conn)?;

    let mut applied = Vec::new();
    for (version, description, sql) in MIGRATIONS {
        if is_applied(conn, version)? {
            continue;
        }
        apply(conn, version, description, sql)?;
        applied.push(*version);
    }

    Ok(applied)
}
