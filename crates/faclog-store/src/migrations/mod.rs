//! Schema setup for the database sink
//!
//! The `logs` table is created by embedded, checksummed migrations so a
//! database handed to [`DatabaseSink`](crate::DatabaseSink) always has the
//! columns the insert expects.

mod checksums;
mod embedded;
mod runner;

pub use runner::apply_migrations;
