pub mod day_session;
pub mod integrity;
pub mod payroll;
pub mod punch;
pub mod punch_kind;
pub mod range;
pub mod schedule;
pub mod status;
