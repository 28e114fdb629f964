use crate::db::log::load_log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::colors::{BLUE, CYAN, GREEN, GREY, RESET, YELLOW};

const OP_TARGET_MAX: usize = 60;

/// Colore ANSI in base all'operazione
fn color_for_operation(op: &str) -> &'static str {
    match op {
        "punch" => GREEN,
        "payroll" => CYAN,
        "schedule" | "schedule_clear" => YELLOW,
        "migration_applied" | "init" => BLUE,
        "export" => GREY,
        _ => RESET,
    }
}

/// Truncate to `max` visible chars, `...` included.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &DbPool) -> AppResult<()> {
        let entries = load_log(&pool.conn)?;

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let rows: Vec<_> = entries
            .into_iter()
            .map(|(id, raw_date, operation, target, message)| {
                let date = chrono::DateTime::parse_from_rfc3339(&raw_date)
                    .map(|dt| dt.format("%FT%T%:z").to_string())
                    .unwrap_or(raw_date);
                (id, date, operation, target, message)
            })
            .collect();

        let id_w = rows.iter().map(|r| r.0.to_string().len()).max().unwrap_or(1);
        let date_w = rows.iter().map(|r| r.1.len()).max().unwrap_or(10);

        println!("📜 Internal log:\n");

        for (id, date, operation, target, message) in rows {
            // padding on the plain text, color only the operation word
            let visible = if target.is_empty() {
                truncate(&operation, OP_TARGET_MAX)
            } else {
                truncate(&format!("{operation} ({target})"), OP_TARGET_MAX)
            };
            let padding = " ".repeat(OP_TARGET_MAX.saturating_sub(visible.chars().count()));

            let color = color_for_operation(&operation);
            let colored = match visible.split_once(' ') {
                Some((op_word, rest)) => format!("{color}{op_word}{RESET} {rest}"),
                None => format!("{color}{visible}{RESET}"),
            };

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                id,
                date,
                colored,
                padding,
                message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}
