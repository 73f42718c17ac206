//! HTTP route handlers for the API

use super::AppState;
use crate::handlers::StateResponse;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};

impl IntoResponse for StateResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

// ============================================================================
// Health Check
// ============================================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

// ============================================================================
// State
// ============================================================================

/// `POST /state`. The body is either the request itself or an envelope
/// carrying it.
pub async fn handle_event(State(state): State<AppState>, body: String) -> StateResponse {
    state.handler.handle_text(&body).await
}

/// `GET /state/*file_name`, file names may contain slashes
pub async fn get_state(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> StateResponse {
    let event = serde_json::json!({ "operation": "GET", "file_name": file_name });
    state.handler.handle(&event).await
}
