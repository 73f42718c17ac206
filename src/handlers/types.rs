//! Request and response types for the state handler

use crate::error::{CoreError, Result};
use crate::store::Metadata;
use axum::http::StatusCode;
use serde_json::{json, Value};

// ============================================================================
// Stages
// ============================================================================

/// Known pipeline stage labels, in pipeline order.
///
/// Stored states are free-form strings; this enum only names the labels the
/// pipeline is documented to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    PendingOcr,
    PendingClassification,
    PendingTranslation,
    Completed,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::PendingOcr,
        Stage::PendingClassification,
        Stage::PendingTranslation,
        Stage::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::PendingOcr => "PENDING_OCR",
            Stage::PendingClassification => "PENDING_CLASSIFICATION",
            Stage::PendingTranslation => "PENDING_TRANSLATION",
            Stage::Completed => "COMPLETED",
        }
    }

    /// Match a stored label exactly
    pub fn parse(label: &str) -> Option<Stage> {
        Stage::ALL.into_iter().find(|s| s.as_str() == label)
    }

    /// The stage that follows this one, `None` once completed
    pub fn next(&self) -> Option<Stage> {
        match self {
            Stage::PendingOcr => Some(Stage::PendingClassification),
            Stage::PendingClassification => Some(Stage::PendingTranslation),
            Stage::PendingTranslation => Some(Stage::Completed),
            Stage::Completed => None,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Requests
// ============================================================================

/// A validated state request
#[derive(Debug, Clone, PartialEq)]
pub enum StateRequest {
    Get {
        file_name: String,
    },
    Update {
        file_name: String,
        new_state: String,
        metadata: Metadata,
    },
}

impl StateRequest {
    /// Build a request from an incoming event.
    ///
    /// The payload is taken from `event["body"]` when present (either a JSON
    /// string or an object), otherwise the event itself is the payload.
    /// Malformed JSON in a string body is a `Json` error; everything else the
    /// caller got wrong is a `Validation` error.
    pub fn from_event(event: &Value) -> Result<Self> {
        let parsed;
        let payload = match event.get("body") {
            Some(Value::String(raw)) => {
                parsed = serde_json::from_str::<Value>(raw)?;
                &parsed
            }
            Some(Value::Null) | None => event,
            Some(body) => body,
        };

        let payload = payload.as_object().ok_or_else(|| {
            CoreError::Validation("request body must be a JSON object".to_string())
        })?;

        Self::from_payload(payload)
    }

    /// Validate a request payload object.
    ///
    /// Checks run in a fixed order: `file_name`, then `operation`, then the
    /// UPDATE-only fields.
    pub fn from_payload(payload: &serde_json::Map<String, Value>) -> Result<Self> {
        let file_name = required_str(payload, "file_name")
            .ok_or_else(|| CoreError::Validation("file_name is required".to_string()))?;

        let operation = match payload.get("operation") {
            Some(Value::String(op)) => op.to_uppercase(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };

        match operation.as_str() {
            "GET" => Ok(StateRequest::Get { file_name }),
            "UPDATE" => {
                let new_state = required_str(payload, "new_state").ok_or_else(|| {
                    CoreError::Validation("new_state is required for UPDATE operation".to_string())
                })?;

                let metadata = match payload.get("metadata") {
                    Some(Value::Object(map)) => map.clone(),
                    Some(Value::Null) | None => Metadata::new(),
                    Some(_) => {
                        return Err(CoreError::Validation(
                            "metadata must be a JSON object".to_string(),
                        ))
                    }
                };

                Ok(StateRequest::Update {
                    file_name,
                    new_state,
                    metadata,
                })
            }
            other => Err(CoreError::Validation(format!(
                "Invalid operation: {}. Use GET or UPDATE",
                other
            ))),
        }
    }

    pub fn file_name(&self) -> &str {
        match self {
            StateRequest::Get { file_name } | StateRequest::Update { file_name, .. } => file_name,
        }
    }

    pub fn operation(&self) -> &'static str {
        match self {
            StateRequest::Get { .. } => "GET",
            StateRequest::Update { .. } => "UPDATE",
        }
    }
}

/// Non-empty string field, `None` when absent, empty, or not a string
fn required_str(payload: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// ============================================================================
// Responses
// ============================================================================

/// Status code plus JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct StateResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl StateResponse {
    pub fn ok(body: Value) -> Self {
        StateResponse {
            status: StatusCode::OK,
            body,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::error(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::error(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    fn error(status: StatusCode, message: impl Into<String>) -> Self {
        StateResponse {
            status,
            body: json!({ "error": message.into() }),
        }
    }

    /// Function-style envelope: numeric status and string-encoded body
    pub fn to_envelope(&self) -> Value {
        json!({
            "statusCode": self.status.as_u16(),
            "body": self.body.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(event: Value) -> Result<StateRequest> {
        StateRequest::from_event(&event)
    }

    fn validation_message(event: Value) -> String {
        match request(event) {
            Err(CoreError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_stage_order() {
        assert_eq!(Stage::PendingOcr.next(), Some(Stage::PendingClassification));
        assert_eq!(Stage::PendingTranslation.next(), Some(Stage::Completed));
        assert_eq!(Stage::Completed.next(), None);
        assert_eq!(Stage::parse("PENDING_TRANSLATION"), Some(Stage::PendingTranslation));
        assert_eq!(Stage::parse("pending_ocr"), None);
        assert_eq!(Stage::Completed.to_string(), "COMPLETED");
    }

    #[test]
    fn test_bare_get_request() {
        let req = request(json!({"operation": "get", "file_name": "doc1.pdf"})).unwrap();
        assert_eq!(
            req,
            StateRequest::Get {
                file_name: "doc1.pdf".to_string()
            }
        );
        assert_eq!(req.operation(), "GET");
    }

    #[test]
    fn test_string_encoded_body() {
        let body = json!({
            "operation": "Update",
            "file_name": "doc1.pdf",
            "new_state": "PENDING_OCR",
            "metadata": {"pages": 5}
        })
        .to_string();
        let req = request(json!({ "body": body })).unwrap();

        match req {
            StateRequest::Update {
                file_name,
                new_state,
                metadata,
            } => {
                assert_eq!(file_name, "doc1.pdf");
                assert_eq!(new_state, "PENDING_OCR");
                assert_eq!(metadata["pages"], json!(5));
            }
            other => panic!("expected update, got {:?}", other),
        }
    }

    #[test]
    fn test_object_body() {
        let req = request(json!({
            "body": {"operation": "GET", "file_name": "a.pdf"}
        }))
        .unwrap();
        assert_eq!(req.file_name(), "a.pdf");
    }

    #[test]
    fn test_malformed_string_body_is_json_error() {
        let err = request(json!({ "body": "{not json" })).unwrap_err();
        assert!(matches!(err, CoreError::Json(_)));
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_non_object_payload_rejected() {
        let msg = validation_message(json!({ "body": "[1, 2]" }));
        assert_eq!(msg, "request body must be a JSON object");
    }

    #[test]
    fn test_missing_file_name_checked_first() {
        assert_eq!(
            validation_message(json!({"operation": "DELETE"})),
            "file_name is required"
        );
        assert_eq!(
            validation_message(json!({"operation": "GET", "file_name": ""})),
            "file_name is required"
        );
        assert_eq!(
            validation_message(json!({"operation": "GET", "file_name": 7})),
            "file_name is required"
        );
    }

    #[test]
    fn test_invalid_operation_named() {
        assert_eq!(
            validation_message(json!({"operation": "delete", "file_name": "a.pdf"})),
            "Invalid operation: DELETE. Use GET or UPDATE"
        );
        assert_eq!(
            validation_message(json!({"file_name": "a.pdf"})),
            "Invalid operation: . Use GET or UPDATE"
        );
    }

    #[test]
    fn test_update_requires_new_state() {
        assert_eq!(
            validation_message(json!({"operation": "UPDATE", "file_name": "a.pdf"})),
            "new_state is required for UPDATE operation"
        );
    }

    #[test]
    fn test_update_metadata_defaults_and_shape() {
        let req = request(json!({
            "operation": "UPDATE",
            "file_name": "a.pdf",
            "new_state": "SOMETHING_CUSTOM",
            "metadata": null
        }))
        .unwrap();
        assert!(matches!(req, StateRequest::Update { ref metadata, .. } if metadata.is_empty()));

        assert_eq!(
            validation_message(json!({
                "operation": "UPDATE",
                "file_name": "a.pdf",
                "new_state": "COMPLETED",
                "metadata": [1]
            })),
            "metadata must be a JSON object"
        );
    }

    #[test]
    fn test_envelope_encodes_body_as_string() {
        let envelope = StateResponse::bad_request("file_name is required").to_envelope();
        assert_eq!(envelope["statusCode"], json!(400));
        let body: Value = serde_json::from_str(envelope["body"].as_str().unwrap()).unwrap();
        assert_eq!(body, json!({"error": "file_name is required"}));
    }
}
