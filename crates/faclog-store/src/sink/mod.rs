//! Concrete sinks
//!
//! - [`FileSink`]: one line per event in a daily file
//! - [`DatabaseSink`]: one row per event in the `logs` table

pub mod database;
pub mod file;

pub use database::DatabaseSink;
pub use file::FileSink;
