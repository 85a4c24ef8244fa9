//! Threshold resolution per facility

use crate::config::LogConfig;
use crate::severity::Severity;
use std::collections::BTreeMap;

/// Why an event was not dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Disabled,
    UnknownLevel,
    BelowThreshold { rank: u8, threshold: u8 },
}

impl Rejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::Disabled => "disabled",
            Rejection::UnknownLevel => "unknown_level",
            Rejection::BelowThreshold { .. } => "below_threshold",
        }
    }
}

/// Resolves effective thresholds and decides pass/fail for candidate events
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdResolver {
    enabled: bool,
    default_threshold: u8,
    facilities: BTreeMap<String, u8>,
}

impl ThresholdResolver {
    pub fn new(enabled: bool, default_threshold: u8, facilities: BTreeMap<String, u8>) -> Self {
        Self {
            enabled,
            default_threshold,
            facilities,
        }
    }

    pub fn from_config(config: &LogConfig) -> Self {
        Self::new(config.enabled, config.threshold, config.facilities.clone())
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Facility override if present, global default otherwise
    pub fn resolve_threshold(&self, facility: &str) -> u8 {
        self.facilities
            .get(facility)
            .copied()
            .unwrap_or(self.default_threshold)
    }

    /// Resolve a level name and check it against the facility threshold
    ///
    /// The enabled flag is checked first and short-circuits everything else.
    pub fn evaluate(&self, level: &str, facility: &str) -> Result<Severity, Rejection> {
        if !self.enabled {
            return Err(Rejection::Disabled);
        }
        let severity = Severity::parse(level).ok_or(Rejection::UnknownLevel)?;
        self.evaluate_severity(severity, facility)
    }

    pub fn evaluate_severity(
        &self,
        severity: Severity,
        facility: &str,
    ) -> Result<Severity, Rejection> {
        if !self.enabled {
            return Err(Rejection::Disabled);
        }
        let threshold = self.resolve_threshold(facility);
        if severity.rank() <= threshold {
            Ok(severity)
        } else {
            Err(Rejection::BelowThreshold {
                rank: severity.rank(),
                threshold,
            })
        }
    }

    pub fn passes(&self, level: &str, facility: &str) -> bool {
        self.evaluate(level, facility).is_ok()
    }
}
