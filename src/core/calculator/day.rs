//! Groups a punch range into employee-local calendar days.

use crate::models::day_session::DaySession;
use crate::models::integrity::IntegrityWarning;
use crate::models::punch::PunchEvent;
use crate::models::range::TimeRange;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use std::collections::BTreeMap;

/// The employee-local calendar day of an instant.
///
/// This is the single day-boundary rule of the crate: every punch is
/// bucketed with it at ingestion, whatever timezone it was stored in.
/// With a UTC-3 offset, `2025-03-11T02:30Z` belongs to 2025-03-10.
pub fn local_day(ts: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    ts.with_timezone(&offset).date_naive()
}

#[derive(Debug, Clone, Copy)]
pub struct DayAggregator {
    offset: FixedOffset,
}

impl DayAggregator {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Build one `DaySession` per local day for `employee_id` within the
    /// inclusive `range`. `worked_hours` is left at 0.
    ///
    /// Duplicated kinds on the same day keep the last instant; each
    /// discarded one is recorded as a `DuplicatePunch` warning.
    pub fn aggregate(
        &self,
        punches: &[PunchEvent],
        employee_id: &str,
        range: &TimeRange,
    ) -> BTreeMap<NaiveDate, DaySession> {
        let mut selected: Vec<&PunchEvent> = punches
            .iter()
            .filter(|p| p.employee_id == employee_id && range.contains(&p.timestamp))
            .collect();

        // Sources give no ordering guarantee.
        selected.sort_by_key(|p| (p.timestamp, p.id));

        let mut days: BTreeMap<NaiveDate, DaySession> = BTreeMap::new();

        for punch in selected {
            let date = local_day(punch.timestamp, self.offset);
            let session = days.entry(date).or_insert_with(|| DaySession::new(date));

            if let Some(previous) = session.set_slot(punch.kind, punch.timestamp) {
                session.warnings.push(IntegrityWarning::DuplicatePunch {
                    date,
                    kind: punch.kind,
                    discarded: previous,
                });
            }
        }

        days
    }
}
