pub mod colors;
pub mod date;
pub mod formatting;
pub mod table;
pub mod time;

pub use formatting::hours2readable;
pub use formatting::secs2clock;
