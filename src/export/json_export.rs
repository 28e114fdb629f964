use crate::errors::AppResult;
use crate::models::payroll::PayrollPeriod;
use std::path::Path;

/// Scrive i periodi payroll completi in JSON formattato.
pub fn write_json(path: &Path, periods: &[PayrollPeriod]) -> AppResult<()> {
    let json = serde_json::to_string_pretty(periods)?;
    std::fs::write(path, json)?;
    Ok(())
}
