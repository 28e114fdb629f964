//! rPunchClock main entrypoint.

use clap::Parser;
use rpunchclock::cli::parser::Cli;
use rpunchclock::run;
use rpunchclock::ui::messages::error;
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` wins; otherwise warnings only, or debug with `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "rpunchclock=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
