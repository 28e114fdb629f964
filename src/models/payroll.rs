use super::day_session::DaySession;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identity of a payroll period. Never two stored records for one key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PayrollKey {
    pub employee_id: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollPeriod {
    pub id: i64, // ⇔ payroll_periods.id, 0 until stored
    pub employee_id: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub hourly_rate: f64,
    pub deductions: f64,
    pub total_hours: f64,
    pub total_overtime_hours: f64,
    pub total_shortfall_hours: f64,
    pub net_pay: f64,
    pub daily_breakdown: Vec<DaySession>,
    pub generated_at: DateTime<Utc>,
}

impl PayrollPeriod {
    pub fn key(&self) -> PayrollKey {
        PayrollKey {
            employee_id: self.employee_id.clone(),
            period_start: self.period_start,
            period_end: self.period_end,
        }
    }

    pub fn has_warnings(&self) -> bool {
        self.daily_breakdown.iter().any(|d| !d.warnings.is_empty())
    }
}
