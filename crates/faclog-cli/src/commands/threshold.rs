//! Threshold command
//!
//! Usage: faclog threshold <FACILITY>

use super::load_config;
use clap::Args;
use faclog_core::ThresholdResolver;
use std::path::Path;

#[derive(Debug, Args)]
pub struct ThresholdArgs {
    /// Facility to resolve
    pub facility: String,
}

/// Execute threshold command
pub fn execute(
    config: Option<&Path>,
    args: ThresholdArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config)?;
    let resolver = ThresholdResolver::from_config(&config);

    println!("{}", resolver.resolve_threshold(&args.facility));

    Ok(())
}
