use serde::Serialize;
use std::fmt;

/// Active state of the live status machine. Re-derived on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Phase {
    AwaitingScheduleEntry,
    BeforeEntry,
    LateEntry,
    EntryRegistered,
    AwaitingLunch,
    WithinLunch,
    ExceedingLunch,
    ReturnRegistered,
    AwaitingScheduleExit,
    BeforeExit,
    Overtime,
    ExitOnTime,
    ExitOvertime,
    DayComplete,
}

impl Phase {
    pub const ALL: [Phase; 14] = [
        Phase::AwaitingScheduleEntry,
        Phase::BeforeEntry,
        Phase::LateEntry,
        Phase::EntryRegistered,
        Phase::AwaitingLunch,
        Phase::WithinLunch,
        Phase::ExceedingLunch,
        Phase::ReturnRegistered,
        Phase::AwaitingScheduleExit,
        Phase::BeforeExit,
        Phase::Overtime,
        Phase::ExitOnTime,
        Phase::ExitOvertime,
        Phase::DayComplete,
    ];

    /// The two sentinels returned when the schedule lacks a needed field.
    pub fn is_undefined_schedule(&self) -> bool {
        matches!(
            self,
            Phase::AwaitingScheduleEntry | Phase::AwaitingScheduleExit
        )
    }

    /// Phases whose `seconds_value` is a running counter rather than 0.
    pub fn is_counting(&self) -> bool {
        matches!(
            self,
            Phase::BeforeEntry
                | Phase::LateEntry
                | Phase::WithinLunch
                | Phase::ExceedingLunch
                | Phase::BeforeExit
                | Phase::Overtime
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Emphasis {
    Neutral,
    Warning,
    Info,
}

/// What a viewer shows for one tick. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusFrame {
    pub seconds_value: u64,
    pub phase: Phase,
    pub label: String,
    pub emphasis: Emphasis,
    /// Lateness of the entry, kept after the entry punch lands.
    pub lateness_seconds: u64,
}
