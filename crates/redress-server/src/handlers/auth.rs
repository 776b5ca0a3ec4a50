//! Registration and login endpoints.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use redress_auth::service::{LoginInput, RegisterInput};
use redress_core::error::CoreError;
use redress_core::models::user::UserPublic;
use serde::{Deserialize, Serialize};

use crate::envelope;
use crate::mail;
use crate::state::AppState;
use crate::templates;

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
struct AuthData {
    token: String,
    user: UserPublic,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// POST /auth/register
pub async fn register(State(state): State<AppState>, Json(body): Json<RegisterBody>) -> Response {
    let (Some(email), Some(password), Some(name)) = (
        present(body.email),
        present(body.password),
        present(body.name),
    ) else {
        return envelope::failure(
            StatusCode::BAD_REQUEST,
            "Email, password and name are required",
        );
    };

    match state
        .auth
        .register(RegisterInput {
            email: email.clone(),
            password,
            name: name.clone(),
        })
        .await
    {
        Ok(out) => {
            mail::notify(state.mailer.as_ref(), templates::welcome(&email, &name)).await;
            envelope::success(
                StatusCode::CREATED,
                AuthData {
                    token: out.token,
                    user: out.user,
                },
                "User registered successfully",
            )
        }
        Err(CoreError::AlreadyExists { .. }) => envelope::failure(
            StatusCode::BAD_REQUEST,
            "User already exists with this email",
        ),
        Err(err) => envelope::map_error(err),
    }
}

/// POST /auth/login
pub async fn login(State(state): State<AppState>, Json(body): Json<LoginBody>) -> Response {
    let (Some(email), Some(password)) = (present(body.email), present(body.password)) else {
        return envelope::failure(StatusCode::UNAUTHORIZED, "Invalid credentials");
    };

    match state.auth.login(LoginInput { email, password }).await {
        Ok(out) => envelope::success(
            StatusCode::OK,
            AuthData {
                token: out.token,
                user: out.user,
            },
            "Login successful",
        ),
        Err(CoreError::AuthenticationFailed { .. }) => {
            envelope::failure(StatusCode::UNAUTHORIZED, "Invalid credentials")
        }
        Err(err) => envelope::map_error(err),
    }
}
