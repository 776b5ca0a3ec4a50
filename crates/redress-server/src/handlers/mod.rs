//! HTTP handlers.

pub mod auth;
pub mod complaints;

use axum::http::StatusCode;
use axum::response::Response;
use serde_json::Value;

use crate::envelope;

/// Liveness probe.
pub async fn healthz() -> Response {
    envelope::success(StatusCode::OK, Value::Null, "ok")
}
