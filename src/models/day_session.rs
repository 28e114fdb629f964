use super::integrity::IntegrityWarning;
use super::punch_kind::PunchKind;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One employee-local calendar day resolved to at most one punch per kind.
///
/// A projection of the punch log: never the source of truth, recomputed on
/// demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySession {
    pub date: NaiveDate,
    pub entry: Option<DateTime<Utc>>,
    pub lunch_out: Option<DateTime<Utc>>,
    pub lunch_return: Option<DateTime<Utc>>,
    pub exit: Option<DateTime<Utc>>,
    pub worked_hours: f64,
    #[serde(default)]
    pub overtime_hours: f64,
    #[serde(default)]
    pub shortfall_hours: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<IntegrityWarning>,
}

impl DaySession {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            entry: None,
            lunch_out: None,
            lunch_return: None,
            exit: None,
            worked_hours: 0.0,
            overtime_hours: 0.0,
            shortfall_hours: 0.0,
            warnings: Vec::new(),
        }
    }

    pub fn slot(&self, kind: PunchKind) -> Option<DateTime<Utc>> {
        match kind {
            PunchKind::Entry => self.entry,
            PunchKind::LunchOut => self.lunch_out,
            PunchKind::LunchReturn => self.lunch_return,
            PunchKind::Exit => self.exit,
        }
    }

    /// Store `ts` in the slot for `kind`, returning what was there before.
    pub fn set_slot(&mut self, kind: PunchKind, ts: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let slot = match kind {
            PunchKind::Entry => &mut self.entry,
            PunchKind::LunchOut => &mut self.lunch_out,
            PunchKind::LunchReturn => &mut self.lunch_return,
            PunchKind::Exit => &mut self.exit,
        };
        slot.replace(ts)
    }

    pub fn is_complete(&self) -> bool {
        self.entry.is_some() && self.exit.is_some()
    }

    pub fn punch_count(&self) -> usize {
        PunchKind::ALL
            .iter()
            .filter(|k| self.slot(**k).is_some())
            .count()
    }
}
