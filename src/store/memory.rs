//! In-memory record store.
//!
//! Volatile storage used when `backend = "memory"` and by tests.
//! All records are lost on restart.

use super::{RecordStore, RecordUpdate, StateRecord};
use crate::error::{CoreError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// Process-local map of file name to record
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, StateRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> CoreError {
    CoreError::Store("memory store lock poisoned".to_string())
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get_item(&self, file_name: &str) -> Result<Option<StateRecord>> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records.get(file_name).cloned())
    }

    async fn upsert_item(&self, file_name: &str, update: RecordUpdate) -> Result<StateRecord> {
        let record = update.into_record(file_name);
        let mut records = self.records.write().map_err(|_| poisoned())?;
        records.insert(file_name.to_string(), record.clone());
        Ok(record)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
