//! Route table.

use axum::Router;
use axum::routing::{get, patch, post};

use crate::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route(
            "/complaints",
            post(handlers::complaints::create).get(handlers::complaints::list_all),
        )
        .route(
            "/complaints/{id}",
            patch(handlers::complaints::update_status).delete(handlers::complaints::remove),
        )
        .route("/users/complaints", get(handlers::complaints::list_own))
        .with_state(state)
}
