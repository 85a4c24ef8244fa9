//! Configuration snapshot
//!
//! Built once at startup and handed to the [`Logger`](crate::dispatcher::Logger);
//! nothing reads it from ambient global state afterwards.

use crate::errors::{FacLogError, Result};
use crate::severity::{Severity, MAX_RANK, MIN_RANK};
use chrono::format::{Item, StrftimeItems};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Facility used by the framework half of the legacy adapter
pub const FRAMEWORK_FACILITY: &str = "codeigniter";

/// Facility used for runtime errors reported through the legacy adapter
pub const RUNTIME_ERROR_FACILITY: &str = "php_error";

/// ISO 8601 with offset
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Immutable logging configuration
#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    pub enabled: bool,
    /// Default threshold rank for facilities without an override
    pub threshold: u8,
    /// Events at or below this rank carry a stack trace into the database
    pub stack_trace_threshold: u8,
    /// Per-facility threshold overrides
    pub facilities: BTreeMap<String, u8>,
    /// Facilities never written to the database sink
    pub database_exclude: BTreeSet<String>,
    pub date_format: String,
    pub log_path: PathBuf,
    pub file_extension: String,
    pub file_header: Option<String>,
    pub database_path: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: Severity::Info.rank(),
            stack_trace_threshold: Severity::Warning.rank(),
            facilities: default_facilities(),
            database_exclude: default_database_exclude(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            log_path: PathBuf::from("logs"),
            file_extension: "log".to_string(),
            file_header: None,
            database_path: None,
        }
    }
}

fn default_facilities() -> BTreeMap<String, u8> {
    [FRAMEWORK_FACILITY, RUNTIME_ERROR_FACILITY]
        .into_iter()
        .map(|f| (f.to_string(), Severity::Info.rank()))
        .collect()
}

fn default_database_exclude() -> BTreeSet<String> {
    [FRAMEWORK_FACILITY, RUNTIME_ERROR_FACILITY]
        .into_iter()
        .map(String::from)
        .collect()
}

/// A threshold as written in a config file: either `4` or `"info"`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawThreshold {
    Rank(i64),
    Name(String),
}

impl RawThreshold {
    fn resolve(&self, context: &str) -> std::result::Result<u8, FacLogError> {
        match self {
            RawThreshold::Rank(rank) => u8::try_from(*rank)
                .ok()
                .filter(|r| (MIN_RANK..=MAX_RANK).contains(r))
                .ok_or_else(|| FacLogError::InvalidThreshold {
                    rank: *rank,
                    context: context.to_string(),
                }),
            RawThreshold::Name(name) => name.parse::<Severity>().map(Severity::rank),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    enabled: Option<bool>,
    threshold: Option<RawThreshold>,
    stack_trace_threshold: Option<RawThreshold>,
    facilities: Option<BTreeMap<String, RawThreshold>>,
    database_exclude: Option<Vec<String>>,
    date_format: Option<String>,
    log_path: Option<PathBuf>,
    file_extension: Option<String>,
    file_header: Option<String>,
    database_path: Option<PathBuf>,
}

impl LogConfig {
    /// Parse a TOML document, filling unspecified keys with defaults
    ///
    /// A facility table or exclusion list that is present but empty keeps
    /// the defaults rather than clearing them.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(source).map_err(|e| FacLogError::ConfigParse {
            reason: e.to_string(),
        })?;

        let mut config = LogConfig::default();
        if let Some(enabled) = raw.enabled {
            config.enabled = enabled;
        }
        if let Some(threshold) = &raw.threshold {
            config.threshold = threshold.resolve("threshold")?;
        }
        if let Some(threshold) = &raw.stack_trace_threshold {
            config.stack_trace_threshold = threshold.resolve("stack_trace_threshold")?;
        }
        if let Some(facilities) = raw.facilities.filter(|f| !f.is_empty()) {
            config.facilities = facilities
                .iter()
                .map(|(name, t)| t.resolve(name).map(|rank| (name.clone(), rank)))
                .collect::<std::result::Result<BTreeMap<_, _>, FacLogError>>()?;
        }
        if let Some(exclude) = raw.database_exclude.filter(|e| !e.is_empty()) {
            config.database_exclude = exclude.into_iter().collect();
        }
        if let Some(date_format) = raw.date_format {
            config.date_format = date_format;
        }
        if let Some(log_path) = raw.log_path {
            config.log_path = log_path;
        }
        if let Some(ext) = raw.file_extension {
            config.file_extension = ext;
        }
        config.file_header = raw.file_header;
        config.database_path = raw.database_path;

        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| FacLogError::ConfigRead {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&source)
    }

    /// Check ranks and the date format
    pub fn validate(&self) -> Result<()> {
        check_rank(self.threshold, "threshold")?;
        check_rank(self.stack_trace_threshold, "stack_trace_threshold")?;
        for (facility, rank) in &self.facilities {
            check_rank(*rank, facility)?;
        }
        validate_date_format(&self.date_format)?;
        Ok(())
    }

    pub fn is_database_excluded(&self, facility: &str) -> bool {
        self.database_exclude.contains(facility)
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_threshold(mut self, threshold: Severity) -> Self {
        self.threshold = threshold.rank();
        self
    }

    pub fn with_stack_trace_threshold(mut self, threshold: Severity) -> Self {
        self.stack_trace_threshold = threshold.rank();
        self
    }

    /// Replace the facility table
    pub fn with_facilities<I, S>(mut self, facilities: I) -> Self
    where
        I: IntoIterator<Item = (S, Severity)>,
        S: Into<String>,
    {
        self.facilities = facilities
            .into_iter()
            .map(|(f, s)| (f.into(), s.rank()))
            .collect();
        self
    }

    /// Replace the database exclusion set
    pub fn with_database_exclude<I, S>(mut self, facilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.database_exclude = facilities.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = path.into();
        self
    }

    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = Some(path.into());
        self
    }
}

fn check_rank(rank: u8, context: &str) -> std::result::Result<(), FacLogError> {
    if (MIN_RANK..=MAX_RANK).contains(&rank) {
        Ok(())
    } else {
        Err(FacLogError::InvalidThreshold {
            rank: i64::from(rank),
            context: context.to_string(),
        })
    }
}

/// Reject strftime patterns chrono cannot render
pub fn validate_date_format(format: &str) -> std::result::Result<(), FacLogError> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(FacLogError::InvalidDateFormat {
            format: format.to_string(),
        });
    }
    Ok(())
}
