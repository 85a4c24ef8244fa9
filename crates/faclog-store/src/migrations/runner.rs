//! Migration runner
//!
//! Applies embedded migrations in order and records each one with the SHA256 of
//! its SQL. A recorded checksum that no longer matches the embedded SQL stops
//! the run: the table layout the sink writes to can no longer be trusted.

#![allow(clippy::result_large_err)]

use crate::errors::{checksum_mismatch, from_rusqlite, migration_error, Result};
use crate::migrations::checksums::compute_checksum;
use crate::migrations::embedded::{get_migrations, Migration};
use rusqlite::{Connection, OptionalExtension};

const CREATE_SCHEMA_VERSION: &str = "CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY,
    migration_id TEXT NOT NULL UNIQUE,
    applied_at INTEGER NOT NULL,
    checksum TEXT
)";

/// Apply every pending migration; returns how many were applied by this call
pub fn apply_migrations(conn: &mut Connection) -> Result<usize> {
    conn.execute_batch(CREATE_SCHEMA_VERSION)
        .map_err(from_rusqlite)?;

    let mut applied = 0;
    for migration in get_migrations() {
        if apply_migration(conn, &migration)? {
            applied += 1;
        }
    }
    Ok(applied)
}

/// `Ok(false)` when the migration was already recorded with a matching checksum
fn apply_migration(conn: &mut Connection, migration: &Migration) -> Result<bool> {
    let checksum = compute_checksum(migration.sql);

    let recorded: Option<Option<String>> = conn
        .query_row(
            "SELECT checksum FROM schema_version WHERE migration_id = ?1",
            [migration.id],
            |row| row.get(0),
        )
        .optional()
        .map_err(from_rusqlite)?;

    match recorded {
        Some(Some(existing)) if existing != checksum => {
            return Err(checksum_mismatch(migration.id, &existing, &checksum));
        }
        Some(_) => return Ok(false),
        None => {}
    }

    let tx = conn.transaction().map_err(from_rusqlite)?;
    tx.execute_batch(migration.sql)
        .map_err(|e| migration_error(migration.id, &e.to_string()))?;
    tx.execute(
        "INSERT INTO schema_version (migration_id, applied_at, checksum) VALUES (?1, ?2, ?3)",
        rusqlite::params![migration.id, chrono::Utc::now().timestamp(), checksum],
    )
    .map_err(from_rusqlite)?;
    tx.commit().map_err(from_rusqlite)?;

    tracing::debug!(
        component = module_path!(),
        op = "migration",
        migration_id = migration.id,
        "applied migration"
    );

    Ok(true)
}
