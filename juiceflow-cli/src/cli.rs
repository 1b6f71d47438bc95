//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use juiceflow::config::DrainPolicy;
use juiceflow::observability::LogFormat;
use std::path::PathBuf;

/// Juiceflow - concurrent orange juice plant simulation
#[derive(Parser, Debug)]
#[command(
    name = "juiceflow",
    author,
    version,
    about = "Concurrent orange juice plant simulation",
    long_about = "Runs several independent juice plants in parallel for a fixed time.\n\n\
                  Each plant is a chain of stage workers connected by single-slot \n\
                  channels. When the time is up every plant is stopped, drained \n\
                  and joined, and the totals are reported."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "JUICEFLOW_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "JUICEFLOW_LOG_FORMAT"
    )]
    pub log_format: LogFormatArg,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the simulation
    Run(RunArgs),

    /// Validate a configuration file without running
    Validate(ValidateArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone, Default)]
pub struct RunArgs {
    /// Path to a JSON configuration file
    #[arg(short, long, env = "JUICEFLOW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the number of plants
    #[arg(long, env = "JUICEFLOW_PLANTS")]
    pub plants: Option<usize>,

    /// Override how long the plants run, in seconds
    #[arg(long, env = "JUICEFLOW_DURATION_SECS")]
    pub duration_secs: Option<f64>,

    /// Override the number of oranges per bottle
    #[arg(long)]
    pub items_per_bottle: Option<u64>,

    /// Override what happens to in-flight oranges on shutdown
    #[arg(long, value_enum)]
    pub drain: Option<DrainArg>,

    /// Print the full report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long)]
    pub config: PathBuf,

    /// Output the resolved configuration as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormatArg {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Json => Self::Json,
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Compact => Self::Compact,
        }
    }
}

/// Drain policy on shutdown
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrainArg {
    /// Stop every channel at once; in-flight oranges become waste
    Discard,
    /// Stop channels in order; every accepted orange is finished
    Cascade,
}

impl From<DrainArg> for DrainPolicy {
    fn from(arg: DrainArg) -> Self {
        match arg {
            DrainArg::Discard => Self::Discard,
            DrainArg::Cascade => Self::Cascade,
        }
    }
}
