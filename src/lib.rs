//! Docstate - processing-stage tracker for documents in a pipeline
//!
//! Keeps one small record per file name: the pipeline stage the document
//! is in (`PENDING_OCR`, `PENDING_CLASSIFICATION`, `PENDING_TRANSLATION`,
//! `COMPLETED`), opaque caller metadata, and the time of the last write.
//!
//! - `handlers`: the GET/UPDATE state handler
//! - `store`: the record store trait with SQLite and in-memory backends
//! - `api`: HTTP surface for the handler
//!
//! # Usage
//!
//! As a library:
//! ```ignore
//! use docstate::{handlers::StateHandler, store::MemoryStore};
//! use std::sync::Arc;
//!
//! let handler = StateHandler::new(Arc::new(MemoryStore::new()));
//! let response = handler
//!     .handle(&serde_json::json!({"operation": "GET", "file_name": "doc1.pdf"}))
//!     .await;
//! ```
//!
//! As a standalone server (CLI):
//! ```text
//! docstate --config ~/.docstate/config.toml
//! ```

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod store;

// Re-export main types for convenience
pub use config::Config;
pub use db::Database;
pub use error::{CoreError, Result};

use config::StoreBackend;
use handlers::{StateHandler, StateResponse};
use std::sync::Arc;
use store::{MemoryStore, RecordStore, SqliteStore};

/// Core service wiring configuration, store and handler together
pub struct Core {
    /// Configuration
    pub config: Config,

    /// Request handler
    handler: Arc<StateHandler>,
}

impl Core {
    /// Create a Core instance, opening the configured store
    pub fn new(config: Config) -> Result<Self> {
        let table = config.store.table_name()?;

        let store: Arc<dyn RecordStore> = match config.store.backend {
            StoreBackend::Sqlite => {
                let db_path = config.db_path();
                tracing::info!("Opening SQLite store at {} (table {})", db_path.display(), table);
                let db = Database::new(db_path)?;
                Arc::new(SqliteStore::new(Arc::new(db), table)?)
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory store; records are lost on exit");
                Arc::new(MemoryStore::new())
            }
        };

        Ok(Self::with_store(config, store))
    }

    /// Create a Core instance around an existing store
    pub fn with_store(config: Config, store: Arc<dyn RecordStore>) -> Self {
        Core {
            config,
            handler: Arc::new(StateHandler::new(store)),
        }
    }

    /// Handle a single raw event outside the HTTP server
    pub async fn invoke(&self, event: &str) -> StateResponse {
        self.handler.handle_text(event).await
    }

    /// Start the HTTP API server
    pub async fn start_api_server(&self) -> Result<()> {
        let addr = self.config.server_addr();
        tracing::info!("Starting API server on {}", addr);
        api::serve(addr, self.handler.clone()).await
    }
}
