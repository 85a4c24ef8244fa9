//! Relational log table sink
//!
//! Inserts one row per event through a parameterized statement. The
//! connection is opened on first use and then shared behind a mutex; a failed
//! insert is reported but does not drop the handle.

#![allow(clippy::result_large_err)]

use crate::db;
use crate::errors::{from_rusqlite, Result};
use crate::migrations::apply_migrations;
use faclog_core::errors::{ExError, ExErrorKind};
use faclog_core::logging_facility::schema::EVENT_DB_CONNECTED;
use faclog_core::stack::capture_caller_stack;
use faclog_core::{LogEvent, LogSink, Severity};
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

/// The only statement this sink ever runs
pub const INSERT_LOG_SQL: &str =
    "INSERT INTO logs (level, facility, tag, message, stacktrace) VALUES (?1, ?2, ?3, ?4, ?5)";

type Opener = Box<dyn Fn() -> Result<Connection> + Send + Sync>;

/// Writes events to the `logs` table
pub struct DatabaseSink {
    opener: Opener,
    conn: Mutex<Option<Connection>>,
    stack_trace_threshold: u8,
}

impl DatabaseSink {
    /// Defer connecting until the first event arrives
    pub fn lazy<F>(opener: F, stack_trace_threshold: u8) -> Self
    where
        F: Fn() -> Result<Connection> + Send + Sync + 'static,
    {
        Self {
            opener: Box::new(opener),
            conn: Mutex::new(None),
            stack_trace_threshold,
        }
    }

    /// Lazily open a SQLite file, configure it and apply migrations
    pub fn open(path: impl Into<PathBuf>, stack_trace_threshold: u8) -> Self {
        let path = path.into();
        Self::lazy(
            move || {
                let mut conn = db::open(&path)?;
                db::configure(&conn)?;
                apply_migrations(&mut conn)?;
                Ok(conn)
            },
            stack_trace_threshold,
        )
    }

    /// Wrap a handle supplied by the host; the `logs` table must already exist
    pub fn from_connection(conn: Connection, stack_trace_threshold: u8) -> Self {
        Self {
            opener: Box::new(|| {
                Err(ExError::new(ExErrorKind::Internal)
                    .with_op("db_connect")
                    .with_message("connection was supplied by the host and cannot be reopened"))
            }),
            conn: Mutex::new(Some(conn)),
            stack_trace_threshold,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.conn
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    /// Whether events at `level` carry a stack trace
    pub fn captures_stack(&self, level: Severity) -> bool {
        level.rank() <= self.stack_trace_threshold
    }
}

impl LogSink for DatabaseSink {
    fn name(&self) -> &'static str {
        "database"
    }

    fn write(&self, event: &LogEvent) -> Result<()> {
        let stack_trace = self
            .captures_stack(event.level)
            .then(capture_caller_stack);

        let mut guard = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.is_none() {
            *guard = Some((self.opener)().map_err(|e| {
                ExError::new(e.kind())
                    .with_op("db_connect")
                    .with_sink("database")
                    .with_message("could not open log database")
                    .with_source(e)
            })?);
            tracing::debug!(
                component = module_path!(),
                event = EVENT_DB_CONNECTED,
                facility = event.facility.as_str(),
            );
        }
        let Some(conn) = guard.as_ref() else {
            return Err(ExError::new(ExErrorKind::Internal).with_op("db_connect"));
        };

        conn.execute(
            INSERT_LOG_SQL,
            rusqlite::params![
                event.level.name(),
                event.facility,
                event.tag,
                event.message,
                stack_trace,
            ],
        )
        .map_err(|e| {
            from_rusqlite(e)
                .with_op("insert_log_row")
                .with_facility(event.facility.as_str())
                .with_sink("database")
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faclog_core::Payload;

    fn migrated_connection() -> Connection {
        let mut conn = db::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        conn
    }

    #[test]
    fn test_lazy_sink_connects_on_first_write() {
        let sink = DatabaseSink::lazy(|| Ok(migrated_connection()), 2);
        assert!(!sink.is_connected());

        let event = LogEvent::new(Severity::Info, "svc", Payload::from("hello"));
        sink.write(&event).unwrap();
        assert!(sink.is_connected());
    }

    #[test]
    fn test_open_failure_reported() {
        let sink = DatabaseSink::lazy(
            || Err(ExError::new(ExErrorKind::Persistence).with_message("no route")),
            2,
        );
        let event = LogEvent::new(Severity::Info, "svc", Payload::from("hello"));

        let err = sink.write(&event).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Persistence);
        assert_eq!(err.op(), Some("db_connect"));
        assert!(!sink.is_connected());
    }

    #[test]
    fn test_missing_table_is_persistence_error() {
        let sink = DatabaseSink::from_connection(db::open_in_memory().unwrap(), 2);
        let event = LogEvent::new(Severity::Info, "svc", Payload::from("hello"));

        let err = sink.write(&event).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Persistence);
        assert_eq!(err.op(), Some("insert_log_row"));
        // Handle survives the failed insert
        assert!(sink.is_connected());
    }

    #[test]
    fn test_stack_threshold_boundary() {
        let sink = DatabaseSink::from_connection(migrated_connection(), 3);
        assert!(sink.captures_stack(Severity::Critical));
        assert!(sink.captures_stack(Severity::Warning));
        assert!(!sink.captures_stack(Severity::Info));
    }
}
