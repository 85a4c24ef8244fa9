use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that is carried in diagnostics
/// (`err.code`) and can be matched on in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    InvalidInput,
    UnknownSeverity,
    InvalidConfig,
    Io,
    Persistence,
    Migration,
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::UnknownSeverity => "ERR_UNKNOWN_SEVERITY",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Migration => "ERR_MIGRATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Sinks report failures with this type; the dispatcher keeps it around long
/// enough to emit it on the diagnostics channel before collapsing to `bool`.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    facility: Option<String>,
    sink: Option<&'static str>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            facility: None,
            sink: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add facility context
    pub fn with_facility(mut self, facility: impl Into<String>) -> Self {
        self.facility = Some(facility.into());
        self
    }

    /// Add the name of the sink that failed
    pub fn with_sink(mut self, sink: &'static str) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn facility(&self) -> Option<&str> {
        self.facility.as_deref()
    }

    pub fn sink(&self) -> Option<&'static str> {
        self.sink
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(facility) = &self.facility {
            write!(f, " (facility: {})", facility)?;
        }
        if let Some(sink) = self.sink {
            write!(f, " (sink: {})", sink)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain failures raised while parsing levels and loading configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FacLogError {
    /// Level name is not one of the fixed severities
    #[error("Unknown severity level: {level}")]
    UnknownSeverity { level: String },

    /// Threshold rank outside of the severity table
    #[error("Threshold {rank} is outside the severity range 1..=6 ({context})")]
    InvalidThreshold { rank: i64, context: String },

    /// Date format string contains an invalid strftime item
    #[error("Invalid date format: {format}")]
    InvalidDateFormat { format: String },

    /// Configuration document could not be parsed
    #[error("Failed to parse configuration: {reason}")]
    ConfigParse { reason: String },

    /// Configuration file could not be read
    #[error("Failed to read configuration {path}: {reason}")]
    ConfigRead { path: String, reason: String },
}

impl From<FacLogError> for ExError {
    fn from(err: FacLogError) -> Self {
        let kind = match &err {
            FacLogError::UnknownSeverity { .. } => ExErrorKind::UnknownSeverity,
            FacLogError::InvalidThreshold { .. }
            | FacLogError::InvalidDateFormat { .. }
            | FacLogError::ConfigParse { .. } => ExErrorKind::InvalidConfig,
            FacLogError::ConfigRead { .. } => ExErrorKind::Io,
        };
        ExError::new(kind).with_message(err.to_string())
    }
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code_and_context() {
        let err = ExError::new(ExErrorKind::Io)
            .with_op("append")
            .with_facility("svc")
            .with_sink("file")
            .with_message("permission denied");

        let rendered = err.to_string();
        assert!(rendered.starts_with("[ERR_IO] in operation 'append'"));
        assert!(rendered.contains("permission denied"));
        assert!(rendered.contains("(facility: svc)"));
        assert!(rendered.contains("(sink: file)"));
    }

    #[test]
    fn test_domain_error_conversion_kind() {
        let ex: ExError = FacLogError::UnknownSeverity {
            level: "LOUD".to_string(),
        }
        .into();
        assert_eq!(ex.kind(), ExErrorKind::UnknownSeverity);
        assert!(ex.message().contains("LOUD"));

        let ex: ExError = FacLogError::InvalidDateFormat {
            format: "%Q".to_string(),
        }
        .into();
        assert_eq!(ex.code(), "ERR_INVALID_CONFIG");
    }

    #[test]
    fn test_source_chain() {
        let inner = ExError::new(ExErrorKind::Persistence).with_message("disk I/O error");
        let outer = ExError::new(ExErrorKind::Internal).with_source(inner);
        assert_eq!(
            outer.source_error().map(|e| e.kind()),
            Some(ExErrorKind::Persistence)
        );
        assert!(std::error::Error::source(&outer).is_some());
    }
}
