//! Log command
//!
//! Usage: faclog log <LEVEL> <FACILITY> <MESSAGE> [--tag <TAG>]

use super::load_config;
use clap::Args;
use faclog_core::Payload;
use std::path::Path;

#[derive(Debug, Args)]
pub struct LogArgs {
    /// Severity name (critical, error, warning, info, debug, all)
    pub level: String,

    /// Facility the event belongs to
    pub facility: String,

    /// Message text
    pub message: String,

    /// Optional tag appended to the facility
    #[arg(short, long)]
    pub tag: Option<String>,
}

/// Execute log command
///
/// An event that was filtered out or that a sink failed to record is an error
/// for the purpose of the exit status.
pub fn execute(config: Option<&Path>, args: LogArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config)?;
    let logger = faclog_store::build_logger(config);

    let payload = match args.tag {
        Some(tag) => Payload::tagged(args.message, tag),
        None => Payload::Plain(args.message),
    };

    if !logger.log(&args.level, &args.facility, payload) {
        return Err(format!(
            "{} event for '{}' was not recorded",
            args.level, args.facility
        )
        .into());
    }

    Ok(())
}
