//! SQL migrations compiled into the binary

/// One schema step, identified by the file it was loaded from
pub struct Migration {
    pub id: &'static str,
    pub sql: &'static str,
}

/// Every migration, oldest first
pub fn get_migrations() -> Vec<Migration> {
    vec![Migration {
        id: "001_logs_table",
        sql: include_str!("../../migrations/001_logs_table.sql"),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logs_table_migration_present() {
        let migrations = get_migrations();
        assert_eq!(migrations[0].id, "001_logs_table");
        assert!(migrations[0].sql.contains("CREATE TABLE IF NOT EXISTS logs"));
    }
}
