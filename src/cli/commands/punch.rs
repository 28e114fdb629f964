use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::calculator::day::local_day;
use crate::core::logic::Core;
use crate::core::sources::PunchRecorder;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::punch::{GeoPoint, NewPunch};
use crate::models::punch_kind::PunchKind;
use crate::ui::messages::{info, success, warning};
use crate::utils::formatting::money;
use crate::utils::time::{local_hhmm, parse_instant};
use chrono::Utc;

/// Handle the `punch` command
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Punch {
        employee,
        kind,
        at,
        lat,
        lon,
    } = cmd
    {
        let policy = cfg.policy()?;

        let employee = employee.trim();
        if employee.is_empty() {
            return Err(AppError::validation("employee id is required"));
        }

        let kind = PunchKind::pk_from_str(kind)
            .ok_or_else(|| AppError::InvalidPunchKind(kind.to_string()))?;

        let now = Utc::now();
        let timestamp = match at {
            Some(s) => parse_instant(s, policy.offset, now)?,
            None => now,
        };

        let geo = match (lat, lon) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(*lat, *lon)?),
            _ => None,
        };

        let pool = DbPool::open(&cfg.database)?;
        let stored = pool.record_punch(NewPunch {
            employee_id: employee.to_string(),
            kind,
            timestamp,
            geo,
        })?;

        let day = local_day(stored.timestamp, policy.offset);
        let time = local_hhmm(&stored.timestamp, policy.offset);

        ttlog_quiet(
            &pool.conn,
            "punch",
            employee,
            &format!("{} at {} {} (id {})", kind, day, time, stored.id),
        );

        success(format!("Punch '{}' recorded for {} on {} at {}", kind, employee, day, time));

        // The month's payroll, once generated, follows every new punch.
        match Core::refresh_month_payroll(&pool, &pool, &pool, employee, day, &policy) {
            Ok(Some(period)) => {
                ttlog_quiet(
                    &pool.conn,
                    "payroll",
                    employee,
                    &format!(
                        "Period {} → {} (id {}) refreshed by punch {}: {:.4} h, net {}",
                        period.period_start,
                        period.period_end,
                        period.id,
                        stored.id,
                        period.total_hours,
                        money(period.net_pay)
                    ),
                );
                info(format!(
                    "Payroll {} → {} updated: {:.2} h, net pay {}",
                    period.period_start,
                    period.period_end,
                    period.total_hours,
                    money(period.net_pay)
                ));
            }
            Ok(None) => {}
            Err(e) => warning(format!("Punch stored but the payroll was not updated: {}", e)),
        }
    }

    Ok(())
}
