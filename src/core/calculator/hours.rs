//! Worked hours of a single day.

use crate::models::day_session::DaySession;
use crate::models::integrity::IntegrityWarning;
use chrono::{Duration, TimeDelta};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Fractional hours of a duration, no rounding.
pub fn duration_hours(d: TimeDelta) -> f64 {
    d.num_milliseconds() as f64 / MILLIS_PER_HOUR
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoursPolicy {
    /// Upper bound of the lunch deduction.
    pub lunch_cap: Duration,
}

impl Default for HoursPolicy {
    fn default() -> Self {
        Self {
            lunch_cap: Duration::hours(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HoursOutcome {
    pub hours: f64,
    pub lunch_deducted: Duration,
    pub warnings: Vec<IntegrityWarning>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HoursCalculator {
    policy: HoursPolicy,
}

impl HoursCalculator {
    pub fn new(policy: HoursPolicy) -> Self {
        Self { policy }
    }

    /// Worked hours of `session`:
    /// - 0 without a full entry/exit pair
    /// - `exit - entry`, minus `min(lunch, lunch_cap)` when both lunch punches exist
    /// - never negative; inverted punches are reported, not subtracted
    pub fn compute(&self, session: &DaySession) -> HoursOutcome {
        let mut warnings = Vec::new();

        let (Some(entry), Some(exit)) = (session.entry, session.exit) else {
            return HoursOutcome {
                hours: 0.0,
                lunch_deducted: Duration::zero(),
                warnings,
            };
        };

        if exit < entry {
            warnings.push(IntegrityWarning::ExitBeforeEntry {
                date: session.date,
                entry,
                exit,
            });
            return HoursOutcome {
                hours: 0.0,
                lunch_deducted: Duration::zero(),
                warnings,
            };
        }

        let lunch_deducted = match (session.lunch_out, session.lunch_return) {
            (Some(out), Some(back)) if back >= out => (back - out).min(self.policy.lunch_cap),
            (Some(out), Some(back)) => {
                warnings.push(IntegrityWarning::LunchReturnBeforeLunchOut {
                    date: session.date,
                    lunch_out: out,
                    lunch_return: back,
                });
                Duration::zero()
            }
            // Incomplete lunch pair: no deduction.
            _ => Duration::zero(),
        };

        let hours = if lunch_deducted.is_zero() {
            duration_hours(exit - entry)
        } else {
            duration_hours(exit - entry) - duration_hours(lunch_deducted)
        };

        HoursOutcome {
            hours: hours.max(0.0),
            lunch_deducted,
            warnings,
        }
    }

    pub fn hours(&self, session: &DaySession) -> f64 {
        self.compute(session).hours
    }

    /// Fill `worked_hours` and append any integrity warning.
    pub fn apply(&self, session: &mut DaySession) {
        let outcome = self.compute(session);
        session.worked_hours = outcome.hours;
        session.warnings.extend(outcome.warnings);
    }
}
