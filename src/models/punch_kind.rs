use serde::{Deserialize, Serialize};
use std::fmt;

/// The four punches of a workday, in their natural order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PunchKind {
    Entry,
    LunchOut,
    LunchReturn,
    Exit,
}

impl PunchKind {
    pub const ALL: [PunchKind; 4] = [
        PunchKind::Entry,
        PunchKind::LunchOut,
        PunchKind::LunchReturn,
        PunchKind::Exit,
    ];

    /// Parse user input. Accepts the canonical names plus a few short aliases
    /// (`in`, `out`, `lunch`, `return`).
    pub fn pk_from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "entry" | "in" => Some(Self::Entry),
            "lunch_out" | "lunch" => Some(Self::LunchOut),
            "lunch_return" | "return" => Some(Self::LunchReturn),
            "exit" | "out" => Some(Self::Exit),
            _ => None,
        }
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            PunchKind::Entry => "entry",
            PunchKind::LunchOut => "lunch_out",
            PunchKind::LunchReturn => "lunch_return",
            PunchKind::Exit => "exit",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "entry" => Some(PunchKind::Entry),
            "lunch_out" => Some(PunchKind::LunchOut),
            "lunch_return" => Some(PunchKind::LunchReturn),
            "exit" => Some(PunchKind::Exit),
            _ => None,
        }
    }
}

impl fmt::Display for PunchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}
