//! HTTP error handling for the dev server
//!
//! Every failure is returned as `{ message, code, details? }` with a status
//! derived from `code`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use numtree_core::services::NodeServiceError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpError {
    /// User-facing error message
    pub message: String,
    /// Machine-readable error code
    pub code: String,
    /// Optional detailed error information for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl HttpError {
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            details: None,
        }
    }

    pub fn with_details(
        message: impl Into<String>,
        code: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            details: Some(details.into()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.code.as_str() {
            "UNAUTHENTICATED" => StatusCode::UNAUTHORIZED,
            "VALIDATION_ERROR" | "INVALID_PARENT" | "INVALID_INPUT" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<NodeServiceError> for HttpError {
    fn from(err: NodeServiceError) -> Self {
        match err {
            NodeServiceError::Database(ref source) => {
                tracing::error!("Database error: {}", source);
                HttpError::with_details("Database operation failed", err.code(), source.to_string())
            }
            _ => HttpError::new(err.to_string(), err.code()),
        }
    }
}
