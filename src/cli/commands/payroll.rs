use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::logic::Core;
use crate::core::payroll::PayrollRequest;
use crate::core::sources::PayrollStore;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::payroll::PayrollPeriod;
use crate::ui::messages::{header, info, success, warning};
use crate::utils::date::{parse_date, parse_month};
use crate::utils::formatting::money;
use crate::utils::hours2readable;
use crate::utils::table::{Column, Table};

fn print_period(p: &PayrollPeriod) {
    header(format!(
        "Payroll #{} {}: {} → {}",
        p.id, p.employee_id, p.period_start, p.period_end
    ));
    println!("Days         : {}", p.daily_breakdown.len());
    println!("Total hours  : {} ({:.4})", hours2readable(p.total_hours), p.total_hours);
    println!("Overtime     : {}", hours2readable(p.total_overtime_hours));
    println!("Shortfall    : {}", hours2readable(p.total_shortfall_hours));
    println!("Hourly rate  : {}", money(p.hourly_rate));
    println!("Deductions   : {}", money(p.deductions));
    println!("Net pay      : {}", money(p.net_pay));

    if p.has_warnings() {
        warning("Some days have integrity warnings, check `days` for details.");
    }
}

fn list(pool: &DbPool, employee: &str) -> AppResult<()> {
    let periods = pool.list_payroll_periods(employee)?;
    if periods.is_empty() {
        warning(format!("No payroll periods stored for {}", employee));
        return Ok(());
    }

    let mut table = Table::new(vec![
        Column::right("ID", 4),
        Column::left("Start", 10),
        Column::left("End", 10),
        Column::right("Hours", 9),
        Column::right("Rate", 8),
        Column::right("Deduct.", 9),
        Column::right("Net pay", 11),
    ]);

    for p in &periods {
        table.add_row(vec![
            p.id.to_string(),
            p.period_start.to_string(),
            p.period_end.to_string(),
            format!("{:.2}", p.total_hours),
            money(p.hourly_rate),
            money(p.deductions),
            money(p.net_pay),
        ]);
    }

    print!("{}", table.render());
    Ok(())
}

/// Handle the `payroll` command
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Payroll {
        employee,
        month,
        from,
        to,
        rate,
        deductions,
        list: list_only,
    } = cmd
    {
        let pool = DbPool::open(&cfg.database)?;

        if *list_only {
            return list(&pool, employee);
        }

        let policy = cfg.policy()?;

        let (start, end) = match (month, from, to) {
            (Some(m), _, _) => {
                let (s, e) = parse_month(m).map_err(AppError::InvalidDate)?;
                (Some(s), Some(e))
            }
            (None, Some(f), Some(t)) => (
                Some(parse_date(f).ok_or_else(|| AppError::InvalidDate(f.clone()))?),
                Some(parse_date(t).ok_or_else(|| AppError::InvalidDate(t.clone()))?),
            ),
            _ => (None, None),
        };

        let request = PayrollRequest {
            employee_id: Some(employee.clone()),
            period_start: start,
            period_end: end,
            hourly_rate: *rate,
            deductions: *deductions,
        };

        let period = Core::generate_payroll(&pool, &pool, &pool, &request, &policy)?;

        ttlog_quiet(
            &pool.conn,
            "payroll",
            employee,
            &format!(
                "Period {} → {} (id {}): {:.4} h, net {}",
                period.period_start,
                period.period_end,
                period.id,
                period.total_hours,
                money(period.net_pay)
            ),
        );

        print_period(&period);
        success(format!("Payroll period stored (id {})", period.id));
        if rate.is_none() {
            info(format!("Hourly rate taken from configuration: {}", money(period.hourly_rate)));
        }
    }

    Ok(())
}
