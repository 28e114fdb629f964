pub mod balance;
pub mod day;
pub mod hours;
