//! # Juiceflow CLI
//!
//! Command-line entry point.
//!
//! Provides:
//! - Configuration loading and validation
//! - A timed multi-plant run with graceful Ctrl+C handling
//! - Summary or JSON reporting

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use juiceflow::observability::{default_level, init_logging};
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_simulation, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(
        cli.log_format.into(),
        default_level(cli.verbose, cli.quiet),
        cli.quiet,
    )?;

    info!(version = env!("CARGO_PKG_VERSION"), "Juiceflow starting");

    let result = match &cli.command {
        Commands::Run(args) => run_simulation(args).await,
        Commands::Validate(args) => run_validate(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}
