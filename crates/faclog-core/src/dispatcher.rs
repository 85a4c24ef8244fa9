//! The `log` entry point
//!
//! Resolution, then independent fan-out to the file and database sinks. Each
//! sink reports a `Result`; the public methods collapse the outcome to `bool`
//! after the failure has been written to the diagnostics channel.

use crate::config::{LogConfig, FRAMEWORK_FACILITY, RUNTIME_ERROR_FACILITY};
use crate::errors::ExError;
use crate::event::{LogEvent, Payload};
use crate::severity::Severity;
use crate::sink::LogSink;
use crate::threshold::ThresholdResolver;
use crate::{log_event_dropped, log_sink_error};

/// Facility used for notes the logger writes about its own sinks
pub const DIAGNOSTICS_FACILITY: &str = "faclog";

/// Multi-sink logger
///
/// Owns the configuration snapshot for its whole lifetime. Safe to share
/// between threads; every call runs synchronously on the caller's thread.
pub struct Logger {
    config: LogConfig,
    resolver: ThresholdResolver,
    file: Box<dyn LogSink>,
    database: Option<Box<dyn LogSink>>,
}

impl Logger {
    /// Build a logger from a configuration snapshot and its sinks
    ///
    /// Without a database sink every facility behaves as if it were
    /// database-excluded.
    pub fn new(
        config: LogConfig,
        file: Box<dyn LogSink>,
        database: Option<Box<dyn LogSink>>,
    ) -> Self {
        let resolver = ThresholdResolver::from_config(&config);
        Self {
            config,
            resolver,
            file,
            database,
        }
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    pub fn resolve_threshold(&self, facility: &str) -> u8 {
        self.resolver.resolve_threshold(facility)
    }

    /// Whether an event at `level` for `facility` would be dispatched
    pub fn passes(&self, level: &str, facility: &str) -> bool {
        self.resolver.passes(level, facility)
    }

    /// Log `data` at the named level
    ///
    /// Returns `false` when logging is disabled, the level is unknown, the event
    /// is below the facility threshold, or any invoked sink failed.
    pub fn log(&self, level: &str, facility: &str, data: impl Into<Payload>) -> bool {
        match self.resolver.evaluate(level, facility) {
            Ok(severity) => self.dispatch(LogEvent::new(severity, facility, data.into())),
            Err(rejection) => {
                log_event_dropped!(facility, level, rejection.as_str());
                false
            }
        }
    }

    fn log_at(&self, severity: Severity, facility: &str, data: Payload) -> bool {
        match self.resolver.evaluate_severity(severity, facility) {
            Ok(severity) => self.dispatch(LogEvent::new(severity, facility, data)),
            Err(rejection) => {
                log_event_dropped!(facility, severity.name(), rejection.as_str());
                false
            }
        }
    }

    pub fn critical(&self, facility: &str, data: impl Into<Payload>) -> bool {
        self.log_at(Severity::Critical, facility, data.into())
    }

    pub fn error(&self, facility: &str, data: impl Into<Payload>) -> bool {
        self.log_at(Severity::Error, facility, data.into())
    }

    pub fn warn(&self, facility: &str, data: impl Into<Payload>) -> bool {
        self.log_at(Severity::Warning, facility, data.into())
    }

    pub fn warning(&self, facility: &str, data: impl Into<Payload>) -> bool {
        self.warn(facility, data)
    }

    pub fn info(&self, facility: &str, data: impl Into<Payload>) -> bool {
        self.log_at(Severity::Info, facility, data.into())
    }

    pub fn debug(&self, facility: &str, data: impl Into<Payload>) -> bool {
        self.log_at(Severity::Debug, facility, data.into())
    }

    /// Legacy adapter for framework error reporting
    ///
    /// Routes to the runtime-error facility when `runtime_error` is set and to
    /// the framework facility otherwise.
    pub fn write_log(&self, level: &str, message: &str, runtime_error: bool) -> bool {
        let facility = if runtime_error {
            RUNTIME_ERROR_FACILITY
        } else {
            FRAMEWORK_FACILITY
        };
        self.log(level, facility, message)
    }

    /// Fan out to both sinks; neither outcome prevents the other attempt
    fn dispatch(&self, event: LogEvent) -> bool {
        let file_ok = match self.file.write(&event) {
            Ok(()) => true,
            Err(err) => {
                log_sink_error!(self.file.name(), event.facility.as_str(), err);
                false
            }
        };

        let database_ok = match &self.database {
            Some(database) if !self.config.is_database_excluded(&event.facility) => {
                match database.write(&event) {
                    Ok(()) => true,
                    Err(err) => {
                        log_sink_error!(database.name(), event.facility.as_str(), err);
                        self.note_database_failure(&event, &err);
                        false
                    }
                }
            }
            _ => true,
        };

        file_ok && database_ok
    }

    /// Leave a trace of a lost database row in the log file
    fn note_database_failure(&self, event: &LogEvent, err: &ExError) {
        let note = LogEvent::new(
            Severity::Error,
            DIAGNOSTICS_FACILITY,
            Payload::Plain(format!(
                "database sink dropped {} event for '{}': {}",
                event.level, event.facility, err
            )),
        );
        if let Err(note_err) = self.file.write(&note) {
            log_sink_error!(self.file.name(), DIAGNOSTICS_FACILITY, note_err);
        }
    }
}
