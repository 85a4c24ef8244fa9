//! Database connection management
//!
//! Provides utilities for opening and configuring SQLite connections

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

/// How long a writer waits on a locked database before failing
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(from_rusqlite)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}

/// Configure a connection for concurrent appends
pub fn configure(conn: &Connection) -> Result<()> {
    conn.busy_timeout(BUSY_TIMEOUT).map_err(from_rusqlite)?;

    // WAL lets readers inspect the log table while a writer holds it; the
    // pragma returns the resulting mode as a row
    let _mode: String = conn
        .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))
        .map_err(from_rusqlite)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configure_in_memory() {
        let conn = open_in_memory().unwrap();
        assert!(configure(&conn).is_ok());
    }

    #[test]
    fn test_open_file_sets_wal() {
        let dir = tempfile::TempDir::new().unwrap();
        let conn = open(dir.path().join("logs.db")).unwrap();
        configure(&conn).unwrap();

        let mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }
}
