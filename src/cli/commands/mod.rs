pub mod config;
pub mod days;
pub mod export;
pub mod init;
pub mod log;
pub mod payroll;
pub mod punch;
pub mod schedule;
pub mod status;
