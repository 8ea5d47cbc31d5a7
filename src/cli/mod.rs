mod commands;
mod completions;
pub mod exit_codes;
pub mod output;
pub mod table;

pub use commands::{suggest, Cli, Commands, ConfigCommands};

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// environment variable holding a tracing filter directive
pub const LOG_ENV_VAR: &str = "GRIDFILTER_LOG";

/// send logs to stderr; `GRIDFILTER_LOG` wins over `--verbose`
pub fn init_logging(verbose: bool) {
    let default = if verbose { "gridfilter=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(default));

    // a subscriber may already be set when embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn run(cli: Cli) -> Result<()> {
    commands::execute(cli)
}
