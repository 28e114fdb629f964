use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for rPunchClock
/// CLI application to record punches and compute worked hours with SQLite
#[derive(Parser)]
#[command(
    name = "rpunchclock",
    version = env!("CARGO_PKG_VERSION"),
    about = "A punch-clock CLI: record punches, compute worked hours and payroll using SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Print debug diagnostics on stderr
    #[arg(global = true, long = "verbose", short = 'v')]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Show the configuration file
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Record a punch (entry, lunch_out, lunch_return, exit)
    Punch {
        /// Employee identifier
        employee: String,

        /// Punch kind: entry|in, lunch_out|lunch, lunch_return|return, exit|out
        kind: String,

        /// Instant of the punch (RFC 3339, "YYYY-MM-DD HH:MM" or "HH:MM" local); default now
        #[arg(long = "at")]
        at: Option<String>,

        #[arg(long = "lat", requires = "lon", allow_hyphen_values = true, help = "Latitude")]
        lat: Option<f64>,

        #[arg(long = "lon", requires = "lat", allow_hyphen_values = true, help = "Longitude")]
        lon: Option<f64>,
    },

    /// Set, show or clear the expected schedule of an employee
    Schedule {
        employee: String,

        #[arg(long = "entry", help = "Expected entry time (HH:MM)")]
        entry: Option<String>,

        #[arg(long = "exit", help = "Expected exit time (HH:MM)")]
        exit: Option<String>,

        #[arg(long = "lunch", help = "Lunch duration in minutes")]
        lunch: Option<u32>,

        #[arg(long = "clear", conflicts_with_all = ["entry", "exit", "lunch"], help = "Remove the schedule")]
        clear: bool,
    },

    /// List day sessions with worked hours
    Days {
        employee: String,

        #[arg(
            long,
            short,
            help = "YYYY, YYYY-MM, YYYY-MM-DD or a range P1:P2 (default: current month)"
        )]
        period: Option<String>,
    },

    /// Generate (or regenerate) a payroll period, or list stored ones
    Payroll {
        employee: String,

        #[arg(long = "month", conflicts_with_all = ["from", "to"], help = "Calendar month (YYYY-MM)")]
        month: Option<String>,

        #[arg(long = "from", requires = "to", help = "Period start (YYYY-MM-DD)")]
        from: Option<String>,

        #[arg(long = "to", requires = "from", help = "Period end (YYYY-MM-DD)")]
        to: Option<String>,

        #[arg(long = "rate", help = "Hourly rate (default: configuration)")]
        rate: Option<f64>,

        #[arg(long = "deductions", allow_hyphen_values = true, help = "Amount deducted from the gross pay (negative for a credit)")]
        deductions: Option<f64>,

        #[arg(long = "list", conflicts_with_all = ["month", "from", "to", "rate", "deductions"], help = "List stored payroll periods")]
        list: bool,
    },

    /// Show the live status of the current workday
    Status {
        employee: String,

        /// Evaluate at this instant instead of now
        #[arg(long = "at")]
        at: Option<String>,

        #[arg(long = "watch", help = "Refresh once per tick until interrupted")]
        watch: bool,

        #[arg(long = "ticks", requires = "watch", help = "Stop watching after N ticks")]
        ticks: Option<u64>,
    },

    /// Export stored payroll periods
    Export {
        employee: String,

        #[arg(long, value_enum, help = "Output format")]
        format: ExportFormat,

        #[arg(long, help = "Absolute path of the output file")]
        file: String,

        #[arg(long, help = "Overwrite an existing file without asking")]
        force: bool,
    },
}
