//! Document state handling logic

use super::types::{Stage, StateRequest, StateResponse};
use crate::error::Result;
use crate::store::{Metadata, RecordStore, RecordUpdate};
use serde_json::{json, Value};
use std::sync::Arc;

/// Get/update handler for per-file processing state
#[derive(Clone)]
pub struct StateHandler {
    store: Arc<dyn RecordStore>,
}

impl StateHandler {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        StateHandler { store }
    }

    /// Handle one event and always produce a response.
    ///
    /// Validation failures become 400s; any other error becomes a 500
    /// carrying the error text.
    pub async fn handle(&self, event: &Value) -> StateResponse {
        let request = match StateRequest::from_event(event) {
            Ok(request) => request,
            Err(e) if e.is_client_error() => {
                tracing::debug!("Rejected state request: {}", e);
                return StateResponse::bad_request(e.to_string());
            }
            Err(e) => {
                tracing::error!("Error parsing state request: {}", e);
                return StateResponse::internal(e.to_string());
            }
        };

        match self.dispatch(&request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(
                    backend = self.store.backend_name(),
                    operation = request.operation(),
                    "Error handling state for {}: {}",
                    request.file_name(),
                    e
                );
                StateResponse::internal(e.to_string())
            }
        }
    }

    /// Handle an event given as raw text.
    ///
    /// Text that is not JSON is handed over as a string-encoded envelope, so
    /// it fails like any other malformed body instead of escaping the handler.
    pub async fn handle_text(&self, raw: &str) -> StateResponse {
        let event: Value =
            serde_json::from_str(raw).unwrap_or_else(|_| json!({ "body": raw }));
        self.handle(&event).await
    }

    async fn dispatch(&self, request: &StateRequest) -> Result<StateResponse> {
        match request {
            StateRequest::Get { file_name } => self.get_state(file_name).await,
            StateRequest::Update {
                file_name,
                new_state,
                metadata,
            } => {
                self.update_state(file_name, new_state.clone(), metadata.clone())
                    .await
            }
        }
    }

    /// Current state for a file. A file never written is a normal
    /// `exists: false` response.
    pub async fn get_state(&self, file_name: &str) -> Result<StateResponse> {
        let record = self.store.get_item(file_name).await?;

        let body = match record {
            Some(record) => json!({
                "file_name": record.file_name,
                "state": record.state,
                "metadata": record.metadata,
                "updated_at": record.updated_at,
                "exists": true
            }),
            None => json!({
                "file_name": file_name,
                "state": null,
                "metadata": {},
                "exists": false
            }),
        };

        Ok(StateResponse::ok(body))
    }

    /// Overwrite state, metadata and timestamp for a file, creating the
    /// record on first write.
    pub async fn update_state(
        &self,
        file_name: &str,
        new_state: String,
        metadata: Metadata,
    ) -> Result<StateResponse> {
        if Stage::parse(&new_state).is_none() {
            tracing::debug!("Storing unrecognized stage {:?} for {}", new_state, file_name);
        }

        let update = RecordUpdate {
            state: new_state,
            metadata,
            updated_at: now_timestamp(),
        };

        let record = self.store.upsert_item(file_name, update).await?;

        tracing::info!("{} -> {}", record.file_name, record.state);

        Ok(StateResponse::ok(json!({
            "file_name": record.file_name,
            "state": record.state,
            "metadata": record.metadata,
            "updated_at": record.updated_at,
            "success": true
        })))
    }
}

/// Current UTC time, RFC 3339 with microseconds
fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
