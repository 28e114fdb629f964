// src/export/logic.rs

use crate::core::sources::PayrollStore;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::export::csv_export::write_csv;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_export::write_json;
use crate::export::model::PayrollDayExport;
use crate::export::{ExportFormat, notify_export_success};
use crate::ui::messages::warning;
use chrono::FixedOffset;
use std::path::Path;

/// Logica di alto livello per l'export.
pub struct ExportLogic;

impl ExportLogic {
    /// Export dei periodi payroll memorizzati per `employee`.
    ///
    /// - `csv`: una riga per giorno di ogni periodo
    /// - `json`: i periodi completi, con il dettaglio giornaliero
    pub fn export(
        pool: &DbPool,
        employee: &str,
        format: ExportFormat,
        file: &str,
        force: bool,
        offset: FixedOffset,
    ) -> AppResult<()> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "Output file path must be absolute: {file}"
            )));
        }

        let periods = pool.list_payroll_periods(employee)?;
        if periods.is_empty() {
            warning(format!("No payroll periods stored for {employee}: nothing to export."));
            return Ok(());
        }

        ensure_writable(path, force)?;

        match format {
            ExportFormat::Csv => {
                let rows = PayrollDayExport::rows(&periods, offset);
                write_csv(path, &rows)?;
            }
            ExportFormat::Json => write_json(path, &periods)?,
        }

        tracing::debug!(employee, periods = periods.len(), format = format.as_str(), "export written");
        ttlog_quiet(
            &pool.conn,
            "export",
            employee,
            &format!("{} periods to {} ({})", periods.len(), path.display(), format.as_str()),
        );

        notify_export_success(&format.as_str().to_uppercase(), path);
        Ok(())
    }
}
