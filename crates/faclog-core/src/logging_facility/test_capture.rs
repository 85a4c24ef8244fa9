//! In-memory diagnostics capture for tests
//!
//! Installs a layer that keeps every diagnostics event so tests can assert on
//! what the logger reported about itself: sink failures, dropped events and
//! lazy connections.

use super::schema::{
    EVENT_DROPPED, EVENT_SINK_ERROR, FIELD_COMPONENT, FIELD_EVENT, FIELD_FACILITY, FIELD_OP,
    FIELD_REASON, FIELD_SINK,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use tracing::field::{Field, Visit};
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// One diagnostics event, flattened to strings
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub component: Option<String>,
    pub op: Option<String>,
    pub event: Option<String>,
    pub facility: Option<String>,
    pub sink: Option<String>,
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    fn from_fields(level: Level, fields: HashMap<String, String>) -> Self {
        let get = |key: &str| fields.get(key).cloned();
        Self {
            level,
            component: get(FIELD_COMPONENT),
            op: get(FIELD_OP),
            event: get(FIELD_EVENT),
            facility: get(FIELD_FACILITY),
            sink: get(FIELD_SINK),
            fields,
        }
    }

    pub fn is(&self, event: &str, facility: &str) -> bool {
        self.event.as_deref() == Some(event) && self.facility.as_deref() == Some(facility)
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}

/// Collects every field as text; `&str` values are kept without Debug quotes
#[derive(Default)]
struct FieldCollector(HashMap<String, String>);

impl Visit for FieldCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }
}

type Events = Arc<Mutex<Vec<CapturedEvent>>>;

/// Layer feeding a shared [`TestCapture`]
pub struct TestCaptureLayer {
    events: Events,
}

impl TestCaptureLayer {
    pub fn new() -> (Self, TestCapture) {
        let events = Events::default();
        (
            Self {
                events: Arc::clone(&events),
            },
            TestCapture { events },
        )
    }
}

impl<S> Layer<S> for TestCaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut collector = FieldCollector::default();
        event.record(&mut collector);
        let captured = CapturedEvent::from_fields(*event.metadata().level(), collector.0);

        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(captured);
    }
}

/// Read side of the capture
#[derive(Clone)]
pub struct TestCapture {
    events: Events,
}

impl TestCapture {
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn events_for(&self, event: &str, facility: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.is(event, facility))
            .collect()
    }

    /// Sinks that reported a failure for `facility`, in order
    pub fn failed_sinks(&self, facility: &str) -> Vec<String> {
        self.events_for(EVENT_SINK_ERROR, facility)
            .into_iter()
            .filter_map(|e| e.sink)
            .collect()
    }

    /// Reasons recorded for events dropped on `facility`, in order
    pub fn drop_reasons(&self, facility: &str) -> Vec<String> {
        self.events_for(EVENT_DROPPED, facility)
            .iter()
            .filter_map(|e| e.field(FIELD_REASON).map(String::from))
            .collect()
    }

    /// # Panics
    ///
    /// Panics if no event with this name was captured for `facility`
    pub fn assert_event_exists(&self, event: &str, facility: &str) {
        let events = self.events();
        assert!(
            events.iter().any(|e| e.is(event, facility)),
            "Expected event event={} facility={} not found in {} captured events",
            event,
            facility,
            events.len()
        );
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn count_events<F>(&self, predicate: F) -> usize
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.events().iter().filter(|e| predicate(e)).count()
    }
}

static GLOBAL_CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the capture layer as the global subscriber (once per process)
///
/// Tests in the same binary share the returned capture, so assertions should
/// key on facility names unique to each test.
///
/// # Example
///
/// ```
/// use faclog_core::logging_facility::test_capture::init_test_capture;
/// use faclog_core::log_event_dropped;
///
/// let capture = init_test_capture();
/// log_event_dropped!("doc_facility", "DEBUG", "below_threshold");
/// assert_eq!(capture.drop_reasons("doc_facility"), vec!["below_threshold"]);
/// ```
pub fn init_test_capture() -> TestCapture {
    GLOBAL_CAPTURE
        .get_or_init(|| {
            let (layer, capture) = TestCaptureLayer::new();
            let _ = tracing_subscriber::registry().with(layer).try_init();
            capture
        })
        .clone()
}
