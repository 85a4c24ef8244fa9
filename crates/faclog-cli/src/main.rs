//! faclog CLI
//!
//! Command-line bootstrap for the faclog logger

use clap::{Parser, Subcommand};
use faclog_core::logging_facility::{init, Profile};
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "faclog")]
#[command(about = "faclog - Facility-filtered multi-sink logging", long_about = None)]
struct Cli {
    /// TOML configuration file (defaults apply when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Log one event through the configured sinks
    Log(commands::log::LogArgs),
    /// Print the effective threshold rank for a facility
    Threshold(commands::threshold::ThresholdArgs),
}

fn main() {
    let cli = Cli::parse();
    init(Profile::Development);

    let result = match cli.command {
        Commands::Log(args) => commands::log::execute(cli.config.as_deref(), args),
        Commands::Threshold(args) => commands::threshold::execute(cli.config.as_deref(), args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
