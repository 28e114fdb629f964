//! Formatting utilities used for CLI and export outputs.

pub fn pad_right(s: &str, width: usize) -> String {
    format!("{:<width$}", s, width = width)
}

pub fn pad_left(s: &str, width: usize) -> String {
    format!("{:>width$}", s, width = width)
}

pub fn mins2readable(mins: i64, want_sign: bool, short: bool) -> String {
    let abs_m = mins.abs();
    let hours = abs_m / 60;
    let minutes = abs_m % 60;

    let sign = if mins > 0 && want_sign {
        "+"
    } else if mins < 0 && want_sign {
        "-"
    } else {
        "" // zero → nessun segno
    };

    if short {
        // es: +02:25 oppure -01:10
        format!("{}{:02}:{:02}", sign, hours, minutes)
    } else {
        // es: +02h 25m oppure -01h 10m
        format!("{}{:02}h {:02}m", sign, hours, minutes)
    }
}

/// Decimal hours → `8h 40min`. Minutes are rounded, not truncated.
pub fn hours2readable(hours: f64) -> String {
    if !hours.is_finite() || hours <= 0.0 {
        return "0h 00min".to_string();
    }
    let total_minutes = (hours * 60.0).round() as i64;
    format!("{}h {:02}min", total_minutes / 60, total_minutes % 60)
}

/// Seconds → `HH:MM:SS`, the live counter display.
pub fn secs2clock(secs: u64) -> String {
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    format!("{:02}:{:02}:{:02}", h, m, s)
}

pub fn money(value: f64) -> String {
    format!("{:.2}", value)
}
