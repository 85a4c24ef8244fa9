use faclog_core::errors::{ExError, ExErrorKind, Result};
use faclog_core::{LogEvent, LogSink};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory sink recording every event it is handed
#[derive(Default)]
pub struct SpySink {
    events: Mutex<Vec<LogEvent>>,
    failing: AtomicBool,
}

impl SpySink {
    #[allow(dead_code)]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A spy that records the event and then reports failure
    #[allow(dead_code)]
    pub fn failing() -> Arc<Self> {
        let spy = Self::default();
        spy.failing.store(true, Ordering::SeqCst);
        Arc::new(spy)
    }

    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    pub fn count(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

impl LogSink for SpySink {
    fn name(&self) -> &'static str {
        "spy"
    }

    fn write(&self, event: &LogEvent) -> Result<()> {
        self.events.lock().unwrap().push(event.clone());
        if self.failing.load(Ordering::SeqCst) {
            return Err(ExError::new(ExErrorKind::Io)
                .with_op("spy_write")
                .with_facility(event.facility.as_str())
                .with_message("spy configured to fail"));
        }
        Ok(())
    }
}
