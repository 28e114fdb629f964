use crate::models::payroll::PayrollPeriod;
use crate::utils::time::optional_local_hhmm;
use chrono::FixedOffset;
use serde::Serialize;

/// One day of a stored payroll period, flattened for CSV / JSON.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct PayrollDayExport {
    pub employee_id: String,
    pub period_start: String,
    pub period_end: String,
    pub date: String,
    pub entry: String,
    pub lunch_out: String,
    pub lunch_return: String,
    pub exit: String,
    pub worked_hours: f64,
    pub overtime_hours: f64,
    pub shortfall_hours: f64,
    pub warnings: usize,
    pub hourly_rate: f64,
    pub day_pay: f64,
}

impl PayrollDayExport {
    pub const HEADERS: [&'static str; 14] = [
        "employee_id",
        "period_start",
        "period_end",
        "date",
        "entry",
        "lunch_out",
        "lunch_return",
        "exit",
        "worked_hours",
        "overtime_hours",
        "shortfall_hours",
        "warnings",
        "hourly_rate",
        "day_pay",
    ];

    /// Rows of every day of `periods`, times rendered in the local offset.
    pub fn rows(periods: &[PayrollPeriod], offset: FixedOffset) -> Vec<Self> {
        periods
            .iter()
            .flat_map(|p| {
                p.daily_breakdown.iter().map(move |d| PayrollDayExport {
                    employee_id: p.employee_id.clone(),
                    period_start: p.period_start.to_string(),
                    period_end: p.period_end.to_string(),
                    date: d.date.to_string(),
                    entry: optional_local_hhmm(d.entry, offset),
                    lunch_out: optional_local_hhmm(d.lunch_out, offset),
                    lunch_return: optional_local_hhmm(d.lunch_return, offset),
                    exit: optional_local_hhmm(d.exit, offset),
                    worked_hours: d.worked_hours,
                    overtime_hours: d.overtime_hours,
                    shortfall_hours: d.shortfall_hours,
                    warnings: d.warnings.len(),
                    hourly_rate: p.hourly_rate,
                    day_pay: d.worked_hours * p.hourly_rate,
                })
            })
            .collect()
    }

    pub(crate) fn to_record(&self) -> Vec<String> {
        vec![
            self.employee_id.clone(),
            self.period_start.clone(),
            self.period_end.clone(),
            self.date.clone(),
            self.entry.clone(),
            self.lunch_out.clone(),
            self.lunch_return.clone(),
            self.exit.clone(),
            format!("{:.4}", self.worked_hours),
            format!("{:.4}", self.overtime_hours),
            format!("{:.4}", self.shortfall_hours),
            self.warnings.to_string(),
            format!("{:.2}", self.hourly_rate),
            format!("{:.2}", self.day_pay),
        ]
    }
}
