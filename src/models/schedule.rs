use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// The already-resolved work schedule of one employee. Every field may be
/// unset; consumers degrade to an "undefined schedule" state instead of
/// failing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleExpectation {
    pub expected_entry: Option<NaiveTime>,
    pub expected_exit: Option<NaiveTime>,
    pub lunch_duration_minutes: Option<u32>,
}

impl ScheduleExpectation {
    pub fn new(entry: NaiveTime, exit: NaiveTime, lunch_minutes: u32) -> Self {
        Self {
            expected_entry: Some(entry),
            expected_exit: Some(exit),
            lunch_duration_minutes: Some(lunch_minutes),
        }
    }

    /// An exit not after the entry time of day ends on the next day.
    pub fn is_overnight(&self) -> bool {
        matches!(
            (self.expected_entry, self.expected_exit),
            (Some(entry), Some(exit)) if exit <= entry
        )
    }
}
