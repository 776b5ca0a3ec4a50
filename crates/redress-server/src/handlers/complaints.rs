//! Complaint endpoints.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use redress_core::error::CoreError;
use redress_core::models::complaint::{
    Category, ComplaintFilter, CreateComplaint, Priority, Status,
};
use redress_core::repository::ComplaintRepository;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::envelope;
use crate::gate::{AdminUser, AuthUser};
use crate::mail;
use crate::state::AppState;
use crate::templates;

#[derive(Debug, Deserialize)]
pub struct CreateComplaintBody {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ListQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusBody {
    #[serde(default)]
    pub status: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// POST /complaints — submit a complaint as the authenticated user.
pub async fn create(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(body): Json<CreateComplaintBody>,
) -> Response {
    let (Some(title), Some(description), Some(category), Some(priority)) = (
        present(body.title),
        present(body.description),
        present(body.category),
        present(body.priority),
    ) else {
        return envelope::failure(StatusCode::BAD_REQUEST, "All fields are required");
    };

    let category = match Category::from_str(&category) {
        Ok(c) => c,
        Err(err) => return envelope::map_error(err),
    };
    let priority = match Priority::from_str(&priority) {
        Ok(p) => p,
        Err(err) => return envelope::map_error(err),
    };
    // The owner always comes from the verified token, never the body.
    let user_id = match claims.user_id() {
        Ok(id) => id,
        Err(_) => {
            return envelope::failure(StatusCode::UNAUTHORIZED, "Invalid or expired token");
        }
    };

    match state
        .complaints
        .create(CreateComplaint {
            title,
            description,
            category,
            priority,
            user_id,
        })
        .await
    {
        Ok(complaint) => {
            mail::notify(
                state.mailer.as_ref(),
                templates::new_complaint(&state.admin_email, &complaint),
            )
            .await;
            envelope::success(
                StatusCode::CREATED,
                complaint,
                "Complaint submitted successfully",
            )
        }
        Err(err) => envelope::map_error(err),
    }
}

/// GET /complaints — administrative listing with optional filters.
pub async fn list_all(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Query(query): Query<ListQuery>,
) -> Response {
    let mut filter = ComplaintFilter::default();
    if let Some(raw) = query.status.filter(|s| !s.is_empty()) {
        match Status::from_str(&raw) {
            Ok(status) => filter.status = Some(status),
            Err(err) => return envelope::map_error(err),
        }
    }
    if let Some(raw) = query.priority.filter(|s| !s.is_empty()) {
        match Priority::from_str(&raw) {
            Ok(priority) => filter.priority = Some(priority),
            Err(err) => return envelope::map_error(err),
        }
    }
    if let Some(raw) = query.category.filter(|s| !s.is_empty()) {
        match Category::from_str(&raw) {
            Ok(category) => filter.category = Some(category),
            Err(err) => return envelope::map_error(err),
        }
    }

    match state.complaints.list_all(filter).await {
        Ok(list) => envelope::success(StatusCode::OK, list, "Complaints retrieved successfully"),
        Err(err) => envelope::map_error(err),
    }
}

/// GET /users/complaints — the caller's own complaints.
pub async fn list_own(State(state): State<AppState>, AuthUser(claims): AuthUser) -> Response {
    let user_id = match claims.user_id() {
        Ok(id) => id,
        Err(_) => {
            return envelope::failure(StatusCode::UNAUTHORIZED, "Invalid or expired token");
        }
    };

    match state.complaints.list_by_owner(user_id).await {
        Ok(list) => {
            envelope::success(StatusCode::OK, list, "User complaints retrieved successfully")
        }
        Err(err) => envelope::map_error(err),
    }
}

/// PATCH /complaints/{id} — administrative status change.
pub async fn update_status(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateStatusBody>,
) -> Response {
    let Some(new_status) = body.status.as_deref().and_then(|s| Status::from_str(s).ok()) else {
        return envelope::failure(StatusCode::BAD_REQUEST, "Valid status is required");
    };
    // An id that is not a UUID cannot name any stored complaint.
    let Ok(id) = Uuid::parse_str(&id) else {
        return envelope::failure(StatusCode::NOT_FOUND, "Complaint not found");
    };

    match state.complaints.update_status(id, new_status).await {
        Ok(change) => {
            mail::notify(
                state.mailer.as_ref(),
                templates::status_update(&state.admin_email, &change.complaint, change.previous),
            )
            .await;
            envelope::success(
                StatusCode::OK,
                change.complaint,
                "Complaint status updated successfully",
            )
        }
        Err(CoreError::NotFound { .. }) => {
            envelope::failure(StatusCode::NOT_FOUND, "Complaint not found")
        }
        Err(err) => envelope::map_error(err),
    }
}

/// DELETE /complaints/{id} — administrative removal.
pub async fn remove(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<String>,
) -> Response {
    let Ok(id) = Uuid::parse_str(&id) else {
        return envelope::failure(StatusCode::NOT_FOUND, "Complaint not found");
    };

    match state.complaints.delete(id).await {
        Ok(()) => envelope::success(StatusCode::OK, Value::Null, "Complaint deleted successfully"),
        Err(CoreError::NotFound { .. }) => {
            envelope::failure(StatusCode::NOT_FOUND, "Complaint not found")
        }
        Err(err) => envelope::map_error(err),
    }
}
