//! Error helpers for faclog-store
//!
//! Maps driver and filesystem failures onto the core `ExError` facility

use faclog_core::errors::{ExError, ExErrorKind};

pub use faclog_core::errors::{io_error, Result};

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Migration)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error for an already-applied migration
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> ExError {
    ExError::new(ExErrorKind::Migration)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}
