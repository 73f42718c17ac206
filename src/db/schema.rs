//! SQLite schema for Docstate
//!
//! One table per configured table name, one row per file name.

use rusqlite::{Connection, Result};

/// Create the state table if it does not exist.
///
/// `table` must already be validated as a plain identifier; it is
/// interpolated into the statement.
pub fn init_table(conn: &Connection, table: &str) -> Result<()> {
    conn.execute(
        &format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                file_name TEXT PRIMARY KEY,
                state TEXT NOT NULL,
                metadata TEXT NOT NULL DEFAULT '{{}}',
                updated_at TEXT NOT NULL
            )"
        ),
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_table_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_table(&conn, "document_states").unwrap();
        init_table(&conn, "document_states").unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                ["document_states"],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }
}
