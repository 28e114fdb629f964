//! SQLite connection wrapper (lightweight for CLI usage).
//!
//! `DbPool` is also the concrete implementation of the collaborator traits
//! the core consumes.

use crate::core::sources::{PayrollStore, PunchRecorder, PunchSource, ScheduleSource};
use crate::db::initialize::init_db;
use crate::db::queries;
use crate::errors::AppResult;
use crate::models::payroll::{PayrollKey, PayrollPeriod};
use crate::models::punch::{NewPunch, PunchEvent};
use crate::models::range::TimeRange;
use crate::models::schedule::ScheduleExpectation;
use rusqlite::{Connection, Result};
use std::path::Path;

pub struct DbPool {
    pub conn: Connection,
}

impl DbPool {
    pub fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(Path::new(path))?;
        Ok(Self { conn })
    }

    /// Open `path` and bring the schema up to date.
    pub fn open(path: &str) -> AppResult<Self> {
        let pool = Self::new(path)?;
        init_db(&pool.conn)?;
        Ok(pool)
    }

    /// Private, migrated, in-memory database.
    pub fn in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()?;
        init_db(&conn)?;
        Ok(Self { conn })
    }
}

impl PunchSource for DbPool {
    fn fetch_punches(&self, employee_id: &str, range: &TimeRange) -> AppResult<Vec<PunchEvent>> {
        queries::load_punches_in_range(&self.conn, employee_id, range)
    }
}

impl ScheduleSource for DbPool {
    fn fetch_schedule(&self, employee_id: &str) -> AppResult<Option<ScheduleExpectation>> {
        queries::load_schedule(&self.conn, employee_id)
    }
}

impl PayrollStore for DbPool {
    fn upsert_payroll_period(&self, record: PayrollPeriod) -> AppResult<PayrollPeriod> {
        queries::upsert_payroll_period(&self.conn, record)
    }

    fn find_payroll_period(&self, key: &PayrollKey) -> AppResult<Option<PayrollPeriod>> {
        queries::find_payroll_period(&self.conn, key)
    }

    fn list_payroll_periods(&self, employee_id: &str) -> AppResult<Vec<PayrollPeriod>> {
        queries::list_payroll_periods(&self.conn, employee_id)
    }
}

impl PunchRecorder for DbPool {
    fn record_punch(&self, punch: NewPunch) -> AppResult<PunchEvent> {
        queries::insert_punch(&self.conn, &punch)
    }
}
