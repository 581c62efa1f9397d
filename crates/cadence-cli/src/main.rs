//! cadence: evaluate recurrence definitions from the command line.
//!
//! Usage:
//!   cadence --inline '{"recurrences": [{"dw": [2], "h": [9], "m": [0]}]}' --count 3
//!   cadence --definition business-hours.json --range --start 2013-03-21T00:00:00Z
//!   echo '{"recurrences": [{"Y": [2015]}]}' | cadence --valid 2015-06-01T00:00:00Z

mod cli;

use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let output = cli::run(&cli, std::io::stdin().lock())?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{output}").context("failed to write output")?;
    Ok(())
}
