pub mod calculator;
pub mod live_status;
pub mod log;
pub mod logic;
pub mod payroll;
pub mod policy;
pub mod sources;
pub mod ticker;
