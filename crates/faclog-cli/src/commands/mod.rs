//! Subcommands

pub mod log;
pub mod threshold;

use faclog_core::LogConfig;
use std::path::Path;

/// Load the configuration snapshot, or the defaults when no file is given
pub fn load_config(path: Option<&Path>) -> faclog_core::Result<LogConfig> {
    match path {
        Some(path) => LogConfig::load(path),
        None => Ok(LogConfig::default()),
    }
}
