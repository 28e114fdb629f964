//! ANSI color helper utilities for terminal output.

use crate::models::status::Emphasis;

pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const CYAN: &str = "\x1b[36m";

/// Status emphasis:
/// warning → red, info → blue, neutral → reset
pub fn color_for_emphasis(emphasis: Emphasis) -> &'static str {
    match emphasis {
        Emphasis::Warning => RED,
        Emphasis::Info => BLUE,
        Emphasis::Neutral => RESET,
    }
}

/// Balance color:
/// \>0 → green
/// \<0 → red
/// 0 → reset
pub fn color_for_balance(value: f64) -> &'static str {
    if value > 0.0 {
        GREEN
    } else if value < 0.0 {
        RED
    } else {
        RESET
    }
}

