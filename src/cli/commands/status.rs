use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::logic::Core;
use crate::core::policy::AccountingPolicy;
use crate::core::sources::ScheduleSource;
use crate::core::ticker::Ticker;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::status::StatusFrame;
use crate::ui::messages::overwrite_line;
use crate::utils::colors::{RESET, color_for_emphasis};
use crate::utils::secs2clock;
use crate::utils::time::parse_instant;
use chrono::{DateTime, Utc};
use std::ops::ControlFlow;
use std::time::Duration;

fn render(frame: &StatusFrame) -> String {
    let mut line = format!(
        "{}{}{}",
        color_for_emphasis(frame.emphasis),
        frame.label,
        RESET
    );
    if frame.phase.is_counting() {
        line.push_str(&format!("  {}", secs2clock(frame.seconds_value)));
    }
    if frame.lateness_seconds > 0 && !frame.phase.is_counting() {
        line.push_str(&format!("  (late by {})", secs2clock(frame.lateness_seconds)));
    }
    if frame.phase.is_undefined_schedule() {
        line.push_str("  (set it with `schedule`)");
    }
    line
}

/// Reload schedule and today's punches, then evaluate at `now`.
fn frame_at(
    pool: &DbPool,
    employee: &str,
    policy: &AccountingPolicy,
    now: DateTime<Utc>,
) -> AppResult<StatusFrame> {
    let schedule = pool.fetch_schedule(employee)?.unwrap_or_default();
    let punches = Core::todays_punch_state(pool, employee, &schedule, now, policy)?;
    Ok(Core::evaluate_live_status(&schedule, &punches, now, policy))
}

/// Handle the `status` command
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Status {
        employee,
        at,
        watch,
        ticks,
    } = cmd
    {
        let policy = cfg.policy()?;
        let pool = DbPool::open(&cfg.database)?;

        if !*watch {
            let now = match at {
                Some(s) => parse_instant(s, policy.offset, Utc::now())?,
                None => Utc::now(),
            };
            let frame = frame_at(&pool, employee, &policy, now)?;
            tracing::debug!(phase = %frame.phase, seconds = frame.seconds_value, "status evaluated");
            println!("{}", render(&frame));
            return Ok(());
        }

        if at.is_some() {
            return Err(AppError::validation("--at cannot be combined with --watch"));
        }

        let ticker = Ticker::new(Duration::from_millis(cfg.tick_interval_ms.max(1)), *ticks);
        ticker.run(|_| -> AppResult<ControlFlow<()>> {
            let frame = frame_at(&pool, employee, &policy, Utc::now())?;
            overwrite_line(render(&frame));
            Ok(ControlFlow::Continue(()))
        })?;
        println!();
    }

    Ok(())
}
