//! Record store abstraction
//!
//! A key-value collaborator keyed by `file_name`. The handler only ever asks
//! for one record or writes one record, so the trait is two calls wide:
//! - `get_item`: point lookup, `None` when the key was never written
//! - `upsert_item`: atomic create-or-replace returning the stored record
//!
//! Backends:
//! - `SqliteStore`: one table in a SQLite file
//! - `MemoryStore`: process-local map, used for tests and `backend = "memory"`

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Opaque caller-supplied metadata attached to a record
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Persisted processing state for one file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    pub file_name: String,
    pub state: String,
    #[serde(default)]
    pub metadata: Metadata,
    pub updated_at: String,
}

/// Attributes written by an upsert. Every field replaces the stored value.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordUpdate {
    pub state: String,
    pub metadata: Metadata,
    pub updated_at: String,
}

impl RecordUpdate {
    fn into_record(self, file_name: &str) -> StateRecord {
        StateRecord {
            file_name: file_name.to_string(),
            state: self.state,
            metadata: self.metadata,
            updated_at: self.updated_at,
        }
    }
}

/// Key-value store holding one `StateRecord` per file name
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Look up a record. A missing key is `Ok(None)`, not an error.
    async fn get_item(&self, file_name: &str) -> Result<Option<StateRecord>>;

    /// Set all attributes of the record, creating it if absent, and return
    /// the record as stored after the write.
    async fn upsert_item(&self, file_name: &str, update: RecordUpdate) -> Result<StateRecord>;

    /// Backend name for logging
    fn backend_name(&self) -> &'static str;
}
