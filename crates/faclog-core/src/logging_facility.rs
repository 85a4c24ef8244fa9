//! Diagnostics side channel for the logging facility itself
//!
//! Sink failures, dropped events and lazy database initialisation are reported
//! here through `tracing`, never through the log sinks being diagnosed (the one
//! exception is the database failure note appended to the log file).
//!
//! # Usage
//!
//! ```rust
//! use faclog_core::logging_facility::{init, Profile};
//!
//! // Initialize once at application startup
//! init(Profile::Development);
//! ```
//!
//! # Macros
//!
//! - `log_sink_error!(sink, facility, err)` - A sink failed to record an event
//! - `log_event_dropped!(facility, level, reason)` - An event did not pass thresholds

pub mod init;
pub mod macros;
pub mod schema;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
