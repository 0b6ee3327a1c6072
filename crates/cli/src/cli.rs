//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Pulse - periodic sampling/aggregation collector
#[derive(Parser, Debug)]
#[command(
    name = "pulse",
    author,
    version,
    about = "Periodic sampling and aggregation collector",
    long_about = "A periodic metric collector built on function sensors.\n\n\
                  Buffers produced values per sensor, drains each window on a \n\
                  restartable interval timer, reduces it through the configured \n\
                  function, and routes the results to configured sinks."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "PULSE_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "PULSE_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the collector pipeline with mock producers
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, default_value = "config.toml", env = "PULSE_CONFIG")]
    pub config: PathBuf,

    /// Run duration in seconds (0 = run until interrupted)
    #[arg(long, default_value = "0", env = "PULSE_DURATION")]
    pub duration: u64,

    /// Maximum number of records to emit (0 = unlimited)
    #[arg(long, default_value = "0", env = "PULSE_MAX_RECORDS")]
    pub max_records: u64,

    /// Mock producer rate per sensor (samples/second)
    #[arg(long, default_value = "25.0", env = "PULSE_PRODUCE_HZ")]
    pub produce_hz: f64,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "PULSE_METRICS_PORT")]
    pub metrics_port: u16,

    /// Validate configuration and exit without running
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show detailed sensor information
    #[arg(long)]
    pub sensors: bool,

    /// Show sink configuration
    #[arg(long)]
    pub sinks: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
