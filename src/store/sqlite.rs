//! SQLite record store.

use super::{Metadata, RecordStore, RecordUpdate, StateRecord};
use crate::db::{schema, Database};
use crate::error::Result;
use async_trait::async_trait;
use rusqlite::OptionalExtension;
use std::sync::Arc;

/// Row as read from SQLite, metadata still JSON text
type RawRow = (String, String, String, String);

/// Record store backed by one SQLite table
pub struct SqliteStore {
    db: Arc<Database>,
    table: String,
}

impl SqliteStore {
    /// Wrap `db`, creating `table` if needed
    pub fn new(db: Arc<Database>, table: &str) -> Result<Self> {
        schema::init_table(&*db.conn()?, table)?;
        Ok(SqliteStore {
            db,
            table: table.to_string(),
        })
    }
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn into_record((file_name, state, metadata, updated_at): RawRow) -> Result<StateRecord> {
    let metadata: Metadata = serde_json::from_str(&metadata)?;
    Ok(StateRecord {
        file_name,
        state,
        metadata,
        updated_at,
    })
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn get_item(&self, file_name: &str) -> Result<Option<StateRecord>> {
        let sql = format!(
            "SELECT file_name, state, metadata, updated_at FROM {} WHERE file_name = ?1",
            self.table
        );
        let key = file_name.to_string();

        let row = self
            .db
            .with_conn(move |conn| conn.query_row(&sql, [key], read_row).optional())
            .await?;

        row.map(into_record).transpose()
    }

    async fn upsert_item(&self, file_name: &str, update: RecordUpdate) -> Result<StateRecord> {
        let sql = format!(
            "INSERT INTO {} (file_name, state, metadata, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(file_name) DO UPDATE SET
                state = excluded.state,
                metadata = excluded.metadata,
                updated_at = excluded.updated_at
             RETURNING file_name, state, metadata, updated_at",
            self.table
        );
        let key = file_name.to_string();
        let metadata = serde_json::to_string(&update.metadata)?;

        let row = self
            .db
            .with_conn(move |conn| {
                conn.query_row(
                    &sql,
                    rusqlite::params![key, update.state, metadata, update.updated_at],
                    read_row,
                )
            })
            .await?;

        into_record(row)
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}
