//! Log payloads and the normalized event handed to sinks

use crate::errors::{ExError, ExErrorKind, Result};
use crate::severity::Severity;
use chrono::{DateTime, Local};

/// What a caller passes as `data`: a bare message or a message with a tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Plain(String),
    Tagged { message: String, tag: String },
}

impl Payload {
    pub fn tagged(message: impl Into<String>, tag: impl Into<String>) -> Self {
        Payload::Tagged {
            message: message.into(),
            tag: tag.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Payload::Plain(message) | Payload::Tagged { message, .. } => message,
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            Payload::Plain(_) => None,
            Payload::Tagged { tag, .. } => Some(tag),
        }
    }

    /// Accept a JSON string or an object of the form `{"msg": .., "tag": ..}`
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::String(message) => Ok(Payload::Plain(message.clone())),
            serde_json::Value::Object(map) => {
                let message = map
                    .get("msg")
                    .and_then(serde_json::Value::as_str)
                    .ok_or_else(|| {
                        ExError::new(ExErrorKind::InvalidInput)
                            .with_op("payload_from_json")
                            .with_message("payload object requires a string 'msg' field")
                    })?;
                match map.get("tag") {
                    None | Some(serde_json::Value::Null) => Ok(Payload::Plain(message.to_string())),
                    Some(serde_json::Value::String(tag)) => Ok(Payload::tagged(message, tag.clone())),
                    Some(other) => Ok(Payload::tagged(message, other.to_string())),
                }
            }
            other => Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("payload_from_json")
                .with_message(format!("unsupported payload: {}", other))),
        }
    }
}

impl From<&str> for Payload {
    fn from(message: &str) -> Self {
        Payload::Plain(message.to_string())
    }
}

impl From<String> for Payload {
    fn from(message: String) -> Self {
        Payload::Plain(message)
    }
}

impl From<&String> for Payload {
    fn from(message: &String) -> Self {
        Payload::Plain(message.clone())
    }
}

impl<M: Into<String>, T: Into<String>> From<(M, T)> for Payload {
    fn from((message, tag): (M, T)) -> Self {
        Payload::tagged(message, tag)
    }
}

/// A single log event, built once per call and dropped after dispatch
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    pub level: Severity,
    pub facility: String,
    pub message: String,
    pub tag: Option<String>,
    pub timestamp: DateTime<Local>,
}

impl LogEvent {
    pub fn new(level: Severity, facility: impl Into<String>, payload: Payload) -> Self {
        let (message, tag) = match payload {
            Payload::Plain(message) => (message, None),
            Payload::Tagged { message, tag } => (message, Some(tag)),
        };
        Self {
            level,
            facility: facility.into(),
            message,
            tag,
            timestamp: Local::now(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }
}
