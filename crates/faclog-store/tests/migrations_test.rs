// Integration tests for the migration runner

use rusqlite::Connection;

fn setup_test_db() -> Connection {
    Connection::open_in_memory().expect("Failed to create in-memory database")
}

fn get_table_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
        .unwrap()
}

#[test]
fn test_apply_migrations_on_empty_db() {
    let mut conn = setup_test_db();

    let result = faclog_store::migrations::apply_migrations(&mut conn);
    assert!(
        result.is_ok(),
        "Migrations should succeed: {:?}",
        result.err()
    );

    let tables = get_table_names(&conn);
    for expected_table in ["logs", "schema_version", "sqlite_sequence"] {
        assert!(
            tables.contains(&expected_table.to_string()),
            "Missing table: {}",
            expected_table
        );
    }
}

#[test]
fn test_logs_table_columns() {
    let mut conn = setup_test_db();
    faclog_store::migrations::apply_migrations(&mut conn).unwrap();

    let mut stmt = conn.prepare("PRAGMA table_info(logs)").unwrap();
    let columns: Vec<String> = stmt
        .query_map([], |row| row.get(1))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(
        columns,
        vec!["id", "created_at", "level", "facility", "tag", "message", "stacktrace"]
    );
}

#[test]
fn test_migrations_recorded_once() {
    let mut conn = setup_test_db();
    faclog_store::migrations::apply_migrations(&mut conn).unwrap();
    faclog_store::migrations::apply_migrations(&mut conn).unwrap();

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);

    let checksum: String = conn
        .query_row(
            "SELECT checksum FROM schema_version WHERE migration_id = '001_logs_table'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(checksum.len(), 64, "SHA256 hex digest expected");
}

#[test]
fn test_existing_rows_survive_reapply() {
    let mut conn = setup_test_db();
    faclog_store::migrations::apply_migrations(&mut conn).unwrap();
    conn.execute(
        "INSERT INTO logs (level, facility, message) VALUES ('INFO', 'svc', 'kept')",
        [],
    )
    .unwrap();

    faclog_store::migrations::apply_migrations(&mut conn).unwrap();

    let message: String = conn
        .query_row("SELECT message FROM logs", [], |row| row.get(0))
        .unwrap();
    assert_eq!(message, "kept");
}
