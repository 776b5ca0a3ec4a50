//! The uniform `{success, data, message, error}` response wrapper.
//!
//! Every endpoint answers with this envelope, including gate denials
//! and internal failures. Internal failures are logged with their
//! cause and reported outward as a generic message only.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use redress_core::error::CoreError;
use serde::Serialize;
use tracing::error;

#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A successful response with payload and message.
pub fn success<T: Serialize>(status: StatusCode, data: T, message: &str) -> Response {
    (
        status,
        Json(Envelope {
            success: true,
            data: Some(data),
            message: Some(message.to_string()),
            error: None,
        }),
    )
        .into_response()
}

/// A failed response carrying only the error string.
pub fn failure(status: StatusCode, error: &str) -> Response {
    (
        status,
        Json(Envelope::<()> {
            success: false,
            data: None,
            message: None,
            error: Some(error.to_string()),
        }),
    )
        .into_response()
}

/// Map a core error onto the envelope.
///
/// Handlers match the specific variants they have bespoke wording for
/// and fall through to this for everything else. Unexpected failures
/// are logged for operators and reported as a generic 500.
pub fn map_error(err: CoreError) -> Response {
    match err {
        CoreError::Validation { message } => failure(StatusCode::BAD_REQUEST, &message),
        CoreError::AlreadyExists { entity } => {
            failure(StatusCode::BAD_REQUEST, &format!("{entity} already exists"))
        }
        CoreError::NotFound { entity, .. } => {
            failure(StatusCode::NOT_FOUND, &format!("{entity} not found"))
        }
        CoreError::AuthenticationFailed { .. } => {
            failure(StatusCode::UNAUTHORIZED, "Invalid credentials")
        }
        CoreError::AuthorizationDenied { .. } => {
            failure(StatusCode::FORBIDDEN, "Admin access required")
        }
        other => {
            error!(error = %other, "request failed");
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}
