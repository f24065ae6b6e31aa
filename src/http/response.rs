//! Error responses.
//!
//! # Responsibilities
//! - Map core errors to HTTP status codes
//! - Give every error body the same JSON shape
//!
//! # Design Decisions
//! - Validation → 400, NotFound → 404, Duplicate → 409
//! - Undecodable bodies are reported as validation errors too, except
//!   bodies over the size limit, which keep their 413
//! - Failed blocking tasks are the only 500s

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tokio::task::JoinError;

use crate::error::CarpoolError;

/// Error body: `{"error": code, "message": ..., "field": ...}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
}

/// Failure of an HTTP handler.
#[derive(Debug)]
pub enum ApiError {
    /// The core rejected the operation.
    Core(CarpoolError),
    /// The body could not be decoded into the expected input type.
    Malformed(JsonRejection),
    /// A blocking persistence task panicked or was cancelled.
    Internal(String),
}

impl From<CarpoolError> for ApiError {
    fn from(err: CarpoolError) -> Self {
        ApiError::Core(err)
    }
}

impl From<JoinError> for ApiError {
    fn from(err: JoinError) -> Self {
        ApiError::Internal(format!("task join error: {}", err))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Malformed(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Core(err) => {
                let status = StatusCode::from_u16(err.http_status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                let field = match &err {
                    CarpoolError::Validation { field, .. } => Some(*field),
                    _ => None,
                };
                (
                    status,
                    ErrorBody {
                        error: err.code(),
                        message: err.to_string(),
                        field,
                    },
                )
            }
            ApiError::Malformed(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ErrorBody {
                    error: "payload_too_large",
                    message: rejection.body_text(),
                    field: None,
                },
            ),
            ApiError::Malformed(rejection) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: "validation_error",
                    message: rejection.body_text(),
                    field: None,
                },
            ),
            ApiError::Internal(message) => {
                tracing::error!(error = %message, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: "internal_error",
                        message,
                        field: None,
                    },
                )
            }
        };

        if status.is_client_error() {
            tracing::debug!(status = %status, error = body.error, message = %body.message, "Request rejected");
        }
        (status, Json(body)).into_response()
    }
}
