use super::model::PayrollDayExport;
use crate::errors::AppResult;
use csv::Writer;
use std::path::Path;

/// Scrive le righe payroll in CSV nel file indicato.
pub fn write_csv(path: &Path, rows: &[PayrollDayExport]) -> AppResult<()> {
    let mut wtr = Writer::from_path(path)?;

    wtr.write_record(PayrollDayExport::HEADERS)?;

    for row in rows {
        wtr.write_record(row.to_record())?;
    }

    wtr.flush()?;
    Ok(())
}
