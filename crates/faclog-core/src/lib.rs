//! faclog core - severity resolution and multi-sink dispatch
//!
//! This crate provides:
//! - The fixed severity table and per-facility threshold resolution
//! - The configuration snapshot handed to the logger at startup
//! - Payload normalisation into a single `LogEvent` shape
//! - Stack capture and rendering for high-severity events
//! - The `LogSink` seam and the `Logger` dispatcher
//! - A `tracing`-based diagnostics channel for the facility itself
//!
//! Concrete file and database sinks live in `faclog-store`.

pub mod config;
pub mod dispatcher;
pub mod errors;
pub mod event;
pub mod logging_facility;
pub mod severity;
pub mod sink;
pub mod stack;
pub mod threshold;

// Re-export commonly used types
pub use config::LogConfig;
pub use dispatcher::Logger;
pub use errors::{ExError, ExErrorKind, FacLogError, Result};
pub use event::{LogEvent, Payload};
pub use severity::Severity;
pub use sink::LogSink;
pub use stack::{StackFrame, Value};
pub use threshold::ThresholdResolver;
