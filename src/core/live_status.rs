//! Live status of the current workday.
//!
//! A pure reducer `(schedule, punch state, now) -> StatusFrame`. Nothing is
//! kept between ticks: the phase is re-derived from scratch each time by
//! walking `RULES` top to bottom and taking the first guard that holds.

use crate::core::calculator::day::local_day;
use crate::core::policy::AccountingPolicy;
use crate::models::day_session::DaySession;
use crate::models::schedule::ScheduleExpectation;
use crate::models::status::{Emphasis, Phase, StatusFrame};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::Serialize;

/// The current-day punches fed to the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PunchState {
    pub entry: Option<DateTime<Utc>>,
    pub lunch_out: Option<DateTime<Utc>>,
    pub lunch_return: Option<DateTime<Utc>>,
    pub exit: Option<DateTime<Utc>>,
}

impl From<&DaySession> for PunchState {
    fn from(s: &DaySession) -> Self {
        Self {
            entry: s.entry,
            lunch_out: s.lunch_out,
            lunch_return: s.lunch_return,
            exit: s.exit,
        }
    }
}

/// Inputs of one tick with the schedule resolved to instants.
#[derive(Debug, Clone, Copy)]
struct Tick {
    now: DateTime<Utc>,
    punches: PunchState,
    expected_entry: Option<DateTime<Utc>>,
    expected_exit: Option<DateTime<Utc>>,
    lunch_allowance: Duration,
}

impl Tick {
    fn working(&self) -> bool {
        self.punches.entry.is_some() && self.punches.exit.is_none()
    }

    fn no_lunch_punch(&self) -> bool {
        self.punches.lunch_out.is_none() && self.punches.lunch_return.is_none()
    }

    fn on_lunch(&self) -> bool {
        self.punches.lunch_out.is_some() && self.punches.lunch_return.is_none()
    }

    fn lunch_elapsed(&self) -> Duration {
        self.punches
            .lunch_out
            .map(|out| (self.now - out).max(Duration::zero()))
            .unwrap_or_else(Duration::zero)
    }

    fn past_expected_exit(&self) -> bool {
        self.expected_exit.is_some_and(|x| self.now >= x)
    }
}

type Guard = fn(&Tick) -> bool;

/// Ordered phase predicates. Entry rules, then lunch rules, then exit
/// rules; the last three cover every state with an exit punch, the three
/// before them every state without one, so some rule always matches.
const RULES: [(Phase, Guard); 14] = [
    (Phase::AwaitingScheduleEntry, |t| {
        t.punches.entry.is_none() && t.expected_entry.is_none()
    }),
    (Phase::BeforeEntry, |t| {
        t.punches.entry.is_none() && t.expected_entry.is_some_and(|e| t.now < e)
    }),
    (Phase::LateEntry, |t| {
        t.punches.entry.is_none() && t.expected_entry.is_some_and(|e| t.now >= e)
    }),
    (Phase::EntryRegistered, |t| {
        t.working()
            && t.no_lunch_punch()
            && t.punches.entry.is_some_and(|entry| {
                let settled = t.expected_entry.map_or(entry, |e| e.max(entry));
                t.now < settled
            })
    }),
    // Lunch skipped: past the expected exit with no lunch punch, the exit
    // rules take over.
    (Phase::AwaitingLunch, |t| {
        t.working() && t.no_lunch_punch() && !t.past_expected_exit()
    }),
    (Phase::WithinLunch, |t| {
        t.working() && t.on_lunch() && t.lunch_elapsed() <= t.lunch_allowance
    }),
    (Phase::ExceedingLunch, |t| {
        t.working() && t.on_lunch() && t.lunch_elapsed() > t.lunch_allowance
    }),
    (Phase::ReturnRegistered, |t| {
        t.working()
            && t.punches.lunch_return.is_some_and(|back| {
                let settled = t
                    .punches
                    .lunch_out
                    .map_or(back, |out| back.max(out + t.lunch_allowance));
                t.now < settled
            })
    }),
    (Phase::AwaitingScheduleExit, |t| {
        t.punches.exit.is_none() && t.expected_exit.is_none()
    }),
    (Phase::BeforeExit, |t| {
        t.punches.exit.is_none() && t.expected_exit.is_some_and(|x| t.now < x)
    }),
    (Phase::Overtime, |t| {
        t.punches.exit.is_none() && t.expected_exit.is_some_and(|x| t.now >= x)
    }),
    (Phase::ExitOnTime, |t| {
        matches!((t.punches.exit, t.expected_exit), (Some(out), Some(x)) if out <= x)
    }),
    (Phase::ExitOvertime, |t| {
        matches!((t.punches.exit, t.expected_exit), (Some(out), Some(x)) if out > x)
    }),
    (Phase::DayComplete, |t| t.punches.exit.is_some()),
];

/// Whole seconds from `from` to `to`, 0 if `to` is not later.
fn secs_between(from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    u64::try_from((to - from).num_seconds()).unwrap_or(0)
}

fn secs(d: Duration) -> u64 {
    u64::try_from(d.num_seconds()).unwrap_or(0)
}

/// `time` on local `day` at `offset`, as a UTC instant.
fn at_local(day: NaiveDate, time: NaiveTime, offset: FixedOffset) -> DateTime<Utc> {
    (day.and_time(time) - TimeDelta::seconds(i64::from(offset.local_minus_utc()))).and_utc()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveStatusEngine {
    offset: FixedOffset,
    default_lunch_minutes: u32,
}

impl LiveStatusEngine {
    pub fn new(offset: FixedOffset, default_lunch_minutes: u32) -> Self {
        Self {
            offset,
            default_lunch_minutes,
        }
    }

    pub fn from_policy(policy: &AccountingPolicy) -> Self {
        Self::new(policy.offset, policy.default_lunch_minutes)
    }

    /// Compute the frame for one tick.
    pub fn evaluate(
        &self,
        schedule: &ScheduleExpectation,
        punches: &PunchState,
        now: DateTime<Utc>,
    ) -> StatusFrame {
        let tick = self.resolve(schedule, punches, now);

        let phase = RULES
            .iter()
            .find(|(_, guard)| guard(&tick))
            .map(|(phase, _)| *phase)
            .unwrap_or(Phase::DayComplete);

        StatusFrame {
            seconds_value: seconds_for(phase, &tick),
            phase,
            label: label_for(phase, &tick).to_string(),
            emphasis: emphasis_for(phase, &tick),
            lateness_seconds: lateness(phase, &tick),
        }
    }

    /// Place the schedule on the workday: the local day of the entry punch,
    /// or of `now` before entry. An exit not after the entry time of day is
    /// an overnight shift ending the next day.
    fn resolve(
        &self,
        schedule: &ScheduleExpectation,
        punches: &PunchState,
        now: DateTime<Utc>,
    ) -> Tick {
        let day = local_day(punches.entry.unwrap_or(now), self.offset);

        let expected_entry = schedule
            .expected_entry
            .map(|t| at_local(day, t, self.offset));

        let expected_exit = schedule.expected_exit.map(|t| {
            let exit = at_local(day, t, self.offset);
            if schedule.is_overnight() {
                exit + Duration::days(1)
            } else {
                exit
            }
        });

        let lunch_minutes = schedule
            .lunch_duration_minutes
            .unwrap_or(self.default_lunch_minutes);

        Tick {
            now,
            punches: *punches,
            expected_entry,
            expected_exit,
            lunch_allowance: Duration::minutes(i64::from(lunch_minutes)),
        }
    }
}

fn seconds_for(phase: Phase, t: &Tick) -> u64 {
    match phase {
        Phase::BeforeEntry => t.expected_entry.map_or(0, |e| secs_between(t.now, e)),
        Phase::LateEntry => t.expected_entry.map_or(0, |e| secs_between(e, t.now)),
        Phase::WithinLunch => secs(t.lunch_allowance - t.lunch_elapsed()),
        Phase::ExceedingLunch => secs(t.lunch_elapsed() - t.lunch_allowance),
        Phase::BeforeExit => t.expected_exit.map_or(0, |x| secs_between(t.now, x)),
        Phase::Overtime => t.expected_exit.map_or(0, |x| secs_between(x, t.now)),
        _ => 0,
    }
}

fn entered_late(t: &Tick) -> bool {
    matches!((t.punches.entry, t.expected_entry), (Some(entry), Some(e)) if entry > e)
}

fn emphasis_for(phase: Phase, t: &Tick) -> Emphasis {
    match phase {
        Phase::AwaitingScheduleEntry
        | Phase::LateEntry
        | Phase::ExceedingLunch
        | Phase::AwaitingScheduleExit => Emphasis::Warning,
        Phase::EntryRegistered if entered_late(t) => Emphasis::Warning,
        Phase::WithinLunch | Phase::Overtime | Phase::ExitOvertime => Emphasis::Info,
        _ => Emphasis::Neutral,
    }
}

fn label_for(phase: Phase, t: &Tick) -> &'static str {
    match phase {
        Phase::AwaitingScheduleEntry => "Entry time not defined",
        Phase::BeforeEntry => "Time until entry",
        Phase::LateEntry => "Late entry",
        Phase::EntryRegistered if t.expected_entry.is_none() => "Entry registered",
        Phase::EntryRegistered if entered_late(t) => "Entry registered (late)",
        Phase::EntryRegistered => "Entry registered (on time)",
        Phase::AwaitingLunch => "Awaiting lunch",
        Phase::WithinLunch => "Lunch time remaining",
        Phase::ExceedingLunch => "Exceeding lunch time",
        Phase::ReturnRegistered => "Return registered",
        Phase::AwaitingScheduleExit => "Exit time not defined",
        Phase::BeforeExit => "Time until end of shift",
        Phase::Overtime => "Overtime",
        Phase::ExitOnTime => "Exit on time",
        Phase::ExitOvertime => "Exit registered (overtime)",
        Phase::DayComplete => "Workday complete",
    }
}

fn lateness(phase: Phase, t: &Tick) -> u64 {
    match (t.punches.entry, t.expected_entry) {
        (Some(entry), Some(e)) => secs_between(e, entry),
        (None, Some(e)) if phase == Phase::LateEntry => secs_between(e, t.now),
        _ => 0,
    }
}
