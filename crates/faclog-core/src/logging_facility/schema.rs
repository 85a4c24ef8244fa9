//! Canonical keys and event names for diagnostics

pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_FACILITY: &str = "facility";
pub const FIELD_LEVEL: &str = "level";
pub const FIELD_SINK: &str = "sink";
pub const FIELD_REASON: &str = "reason";

pub const FIELD_ERR_CODE: &str = "err.code";
pub const FIELD_ERR_MESSAGE: &str = "err.message";

pub const EVENT_SINK_ERROR: &str = "sink_error";
pub const EVENT_DROPPED: &str = "event_dropped";
pub const EVENT_DB_CONNECTED: &str = "db_connected";

pub const OP_DISPATCH: &str = "dispatch";
