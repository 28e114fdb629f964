use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::sources::ScheduleSource;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::queries::{delete_schedule, save_schedule};
use crate::errors::AppResult;
use crate::models::schedule::ScheduleExpectation;
use crate::ui::messages::{info, success, warning};
use crate::utils::time::parse_optional_time;

fn fmt_time(t: Option<chrono::NaiveTime>) -> String {
    t.map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

fn describe(s: &ScheduleExpectation) -> String {
    let lunch = s
        .lunch_duration_minutes
        .map(|m| format!("{m} min"))
        .unwrap_or_else(|| "default".to_string());
    format!(
        "entry {} | exit {} | lunch {}",
        fmt_time(s.expected_entry),
        fmt_time(s.expected_exit),
        lunch
    )
}

/// Handle the `schedule` command
///
/// Without options the current schedule is shown. Given options are merged
/// into the stored schedule, the others are kept.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Schedule {
        employee,
        entry,
        exit,
        lunch,
        clear,
    } = cmd
    {
        let pool = DbPool::open(&cfg.database)?;

        if *clear {
            if delete_schedule(&pool.conn, employee)? {
                ttlog_quiet(&pool.conn, "schedule_clear", employee, "Schedule removed");
                success(format!("Schedule removed for {}", employee));
            } else {
                warning(format!("No schedule stored for {}", employee));
            }
            return Ok(());
        }

        let current = pool.fetch_schedule(employee)?;

        if entry.is_none() && exit.is_none() && lunch.is_none() {
            match current {
                Some(s) => info(format!("Schedule of {}: {}", employee, describe(&s))),
                None => warning(format!("No schedule stored for {}", employee)),
            }
            return Ok(());
        }

        let mut schedule = current.unwrap_or_default();
        if let Some(t) = parse_optional_time(entry.as_ref())? {
            schedule.expected_entry = Some(t);
        }
        if let Some(t) = parse_optional_time(exit.as_ref())? {
            schedule.expected_exit = Some(t);
        }
        if lunch.is_some() {
            schedule.lunch_duration_minutes = *lunch;
        }

        save_schedule(&pool.conn, employee, &schedule)?;
        ttlog_quiet(&pool.conn, "schedule", employee, &describe(&schedule));

        success(format!("Schedule of {} saved: {}", employee, describe(&schedule)));
    }

    Ok(())
}
