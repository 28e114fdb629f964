use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::calculator::balance::{apply_balance, daily_load_hours};
use crate::core::logic::Core;
use crate::core::sources::ScheduleSource;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::range::TimeRange;
use crate::ui::messages::{header, warning};
use crate::utils::colors::{RESET, color_for_balance};
use crate::utils::date::{current_month, resolve_period};
use crate::utils::formatting::mins2readable;
use crate::utils::hours2readable;
use crate::utils::table::{Column, Table};
use crate::utils::time::optional_local_hhmm;
use chrono::Utc;

/// Handle the `days` command
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Days { employee, period } = cmd {
        let policy = cfg.policy()?;

        let (first, last) = match period {
            Some(p) => resolve_period(p),
            None => current_month(Utc::now(), policy.offset),
        }
        .map_err(AppError::InvalidDate)?;

        let pool = DbPool::open(&cfg.database)?;
        let range = TimeRange::local_days(first, last, policy.offset)?;
        let mut days = Core::compute_day_sessions(&pool, employee, &range, &policy)?;

        header(format!("{}: {} → {}", employee, first, last));

        if days.is_empty() {
            warning("No punches in this period.");
            return Ok(());
        }

        let load = pool
            .fetch_schedule(employee)?
            .and_then(|s| daily_load_hours(&s, &policy.hours, policy.default_lunch_minutes));
        if let Some(load_hours) = load {
            for session in days.values_mut() {
                apply_balance(session, load_hours);
            }
        }

        let mut table = Table::new(vec![
            Column::left("Date", 10),
            Column::left("Entry", 5),
            Column::left("L.out", 5),
            Column::left("L.ret", 5),
            Column::left("Exit", 5),
            Column::right("Worked", 10),
            Column::right("Balance", 8),
        ]);

        let mut total_hours = 0.0;
        let mut total_balance = 0.0;
        let mut warnings = Vec::new();

        for session in days.values() {
            let balance = session.overtime_hours - session.shortfall_hours;
            total_hours += session.worked_hours;
            total_balance += balance;

            let balance_cell = if load.is_some() {
                mins2readable((balance * 60.0).round() as i64, true, true)
            } else {
                "-".to_string()
            };

            table.add_row(vec![
                session.date.to_string(),
                optional_local_hhmm(session.entry, policy.offset),
                optional_local_hhmm(session.lunch_out, policy.offset),
                optional_local_hhmm(session.lunch_return, policy.offset),
                optional_local_hhmm(session.exit, policy.offset),
                hours2readable(session.worked_hours),
                balance_cell,
            ]);

            warnings.extend(session.warnings.iter().cloned());
        }

        print!("{}", table.render());
        println!();
        println!("Total worked : {}", hours2readable(total_hours));
        if load.is_some() {
            println!(
                "Balance      : {}{}{}",
                color_for_balance(total_balance),
                mins2readable((total_balance * 60.0).round() as i64, true, false),
                RESET
            );
        }

        for w in &warnings {
            warning(w);
        }
    }

    Ok(())
}
