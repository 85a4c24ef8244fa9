//! Fixed severity table
//!
//! Lower rank means more severe. An event passes a threshold when its rank is
//! less than or equal to the threshold rank.

use crate::errors::FacLogError;
use std::fmt;
use std::str::FromStr;

/// Named severity levels, ordered from most to least severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Critical = 1,
    Error = 2,
    Warning = 3,
    Info = 4,
    Debug = 5,
    All = 6,
}

/// Lowest valid rank (most severe)
pub const MIN_RANK: u8 = 1;

/// Highest valid rank (least severe)
pub const MAX_RANK: u8 = 6;

impl Severity {
    /// Every level in rank order
    pub const ALL_LEVELS: [Severity; 6] = [
        Severity::Critical,
        Severity::Error,
        Severity::Warning,
        Severity::Info,
        Severity::Debug,
        Severity::All,
    ];

    pub fn rank(self) -> u8 {
        self as u8
    }

    /// Canonical upper-case name, as persisted in the `level` column
    pub fn name(self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Info => "INFO",
            Severity::Debug => "DEBUG",
            Severity::All => "ALL",
        }
    }

    /// First character of the name, used in file lines (`E/facility: ...`)
    pub fn initial(self) -> char {
        match self {
            Severity::Critical => 'C',
            Severity::Error => 'E',
            Severity::Warning => 'W',
            Severity::Info => 'I',
            Severity::Debug => 'D',
            Severity::All => 'A',
        }
    }

    /// Case-insensitive lookup; `None` for unrecognised names
    pub fn parse(name: &str) -> Option<Severity> {
        match name.to_ascii_uppercase().as_str() {
            "CRITICAL" => Some(Severity::Critical),
            "ERROR" => Some(Severity::Error),
            "WARNING" => Some(Severity::Warning),
            "INFO" => Some(Severity::Info),
            "DEBUG" => Some(Severity::Debug),
            "ALL" => Some(Severity::All),
            _ => None,
        }
    }

    pub fn from_rank(rank: u8) -> Option<Severity> {
        Self::ALL_LEVELS.into_iter().find(|s| s.rank() == rank)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Severity {
    type Err = FacLogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::parse(s).ok_or_else(|| FacLogError::UnknownSeverity {
            level: s.to_string(),
        })
    }
}
