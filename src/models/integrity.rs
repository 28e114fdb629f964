//! Non-fatal data-integrity findings.
//!
//! These never abort a computation: the calculators fall back to a safe
//! value and attach the finding to the `DaySession` so it can be reported
//! upward.

use super::punch_kind::PunchKind;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IntegrityWarning {
    /// Exit earlier than entry. Worked hours clamped to 0.
    ExitBeforeEntry {
        date: NaiveDate,
        entry: DateTime<Utc>,
        exit: DateTime<Utc>,
    },
    /// Lunch return earlier than lunch out. Lunch deduction ignored.
    LunchReturnBeforeLunchOut {
        date: NaiveDate,
        lunch_out: DateTime<Utc>,
        lunch_return: DateTime<Utc>,
    },
    /// More than one punch of the same kind on one day. The last one is kept.
    DuplicatePunch {
        date: NaiveDate,
        kind: PunchKind,
        discarded: DateTime<Utc>,
    },
}

impl fmt::Display for IntegrityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityWarning::ExitBeforeEntry { date, entry, exit } => write!(
                f,
                "{date}: exit ({}) before entry ({}), worked hours set to 0",
                exit.to_rfc3339(),
                entry.to_rfc3339()
            ),
            IntegrityWarning::LunchReturnBeforeLunchOut {
                date,
                lunch_out,
                lunch_return,
            } => write!(
                f,
                "{date}: lunch return ({}) before lunch out ({}), lunch deduction ignored",
                lunch_return.to_rfc3339(),
                lunch_out.to_rfc3339()
            ),
            IntegrityWarning::DuplicatePunch {
                date,
                kind,
                discarded,
            } => write!(
                f,
                "{date}: duplicate '{kind}' punch, discarded {}",
                discarded.to_rfc3339()
            ),
        }
    }
}
