//! Canonical diagnostics macros
//!
//! Callers must depend on `tracing`.

/// Report a sink failure
///
/// # Example
///
/// ```
/// # use faclog_core::log_sink_error;
/// # use faclog_core::errors::{ExError, ExErrorKind};
/// let err = ExError::new(ExErrorKind::Io).with_message("disk full");
/// log_sink_error!("file", "billing", err);
/// ```
#[macro_export]
macro_rules! log_sink_error {
    ($sink:expr, $facility:expr, $err:expr) => {{
        let err: &$crate::errors::ExError = &$err;
        tracing::error!(
            component = module_path!(),
            op = $crate::logging_facility::schema::OP_DISPATCH,
            event = $crate::logging_facility::schema::EVENT_SINK_ERROR,
            sink = $sink,
            facility = $facility,
            err.code = err.code(),
            err.message = err.message(),
        );
    }};
}

/// Report an event that was not dispatched
///
/// # Example
///
/// ```
/// # use faclog_core::log_event_dropped;
/// log_event_dropped!("billing", "DEBUG", "below_threshold");
/// ```
#[macro_export]
macro_rules! log_event_dropped {
    ($facility:expr, $level:expr, $reason:expr) => {
        tracing::debug!(
            component = module_path!(),
            op = $crate::logging_facility::schema::OP_DISPATCH,
            event = $crate::logging_facility::schema::EVENT_DROPPED,
            facility = $facility,
            level = $level,
            reason = $reason,
        );
    };
}
