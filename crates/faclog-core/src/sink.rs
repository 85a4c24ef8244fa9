//! Sink trait shared by the file and database writers
//!
//! Sinks are stateless with respect to events: they receive a borrowed
//! [`LogEvent`], act on it and keep no reference afterwards.

use crate::errors::Result;
use crate::event::LogEvent;
use std::sync::Arc;

/// A destination for log events
///
/// Implementations must be safe to call from concurrent threads; the
/// dispatcher holds them behind a shared reference.
pub trait LogSink: Send + Sync {
    /// Short stable name used in diagnostics (`file`, `database`)
    fn name(&self) -> &'static str;

    /// Record one event
    ///
    /// # Errors
    ///
    /// Returns the reason the event could not be recorded. The dispatcher
    /// reports it on the diagnostics channel and never propagates it further.
    fn write(&self, event: &LogEvent) -> Result<()>;
}

impl<S: LogSink + ?Sized> LogSink for Arc<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn write(&self, event: &LogEvent) -> Result<()> {
        (**self).write(event)
    }
}
