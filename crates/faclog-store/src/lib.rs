//! faclog store - file and SQLite sinks
//!
//! This crate provides:
//! - A daily-rotated append-only file sink
//! - A lazily connected SQLite sink with optional stack traces
//! - Embedded migrations for the `logs` table
//! - [`build_logger`] wiring both sinks from a [`LogConfig`]

#![allow(clippy::result_large_err)]

pub mod db;
pub mod errors;
pub mod migrations;
pub mod sink;

pub use sink::{DatabaseSink, FileSink};

use faclog_core::{LogConfig, LogSink, Logger};

/// Build a logger whose sinks follow the configuration
///
/// The database sink is only created when `database_path` is set; it does not
/// touch the database until the first row is written.
pub fn build_logger(config: LogConfig) -> Logger {
    let file: Box<dyn LogSink> = Box::new(FileSink::from_config(&config));
    let database = config.database_path.as_ref().map(|path| {
        Box::new(DatabaseSink::open(path, config.stack_trace_threshold)) as Box<dyn LogSink>
    });
    Logger::new(config, file, database)
}
