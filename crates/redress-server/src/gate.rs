//! Request authentication and role enforcement.
//!
//! [`AuthUser`] and [`AdminUser`] are extractors: a handler that takes
//! one runs only after the bearer token has been verified (and, for
//! [`AdminUser`], the admin role confirmed). The denial is an explicit
//! tagged value that renders as the uniform envelope, so callers
//! either hold a usable identity or never run at all.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use redress_auth::config::AuthConfig;
use redress_auth::token::{self, IdentityClaims};

use crate::envelope;
use crate::state::AppState;

/// Why a gated request was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDenial {
    /// No `Authorization` header, or not the `Bearer` scheme.
    TokenRequired,
    /// Bearer token present but failed verification.
    TokenInvalid,
    /// Verified identity lacks the admin role.
    AdminRequired,
}

impl GateDenial {
    pub fn status(self) -> StatusCode {
        match self {
            GateDenial::TokenRequired | GateDenial::TokenInvalid => StatusCode::UNAUTHORIZED,
            GateDenial::AdminRequired => StatusCode::FORBIDDEN,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            GateDenial::TokenRequired => "Access token required",
            GateDenial::TokenInvalid => "Invalid or expired token",
            GateDenial::AdminRequired => "Admin access required",
        }
    }
}

impl IntoResponse for GateDenial {
    fn into_response(self) -> Response {
        envelope::failure(self.status(), self.message())
    }
}

/// Pull the token out of `Authorization: Bearer <token>`.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Verify the bearer token on a request and return its claims.
pub fn require_auth(
    headers: &HeaderMap,
    config: &AuthConfig,
) -> Result<IdentityClaims, GateDenial> {
    let raw = bearer_token(headers).ok_or(GateDenial::TokenRequired)?;
    token::verify_token(raw, config).ok_or(GateDenial::TokenInvalid)
}

/// [`require_auth`] plus the admin role check.
pub fn require_admin(
    headers: &HeaderMap,
    config: &AuthConfig,
) -> Result<IdentityClaims, GateDenial> {
    let claims = require_auth(headers, config)?;
    if !claims.is_admin() {
        return Err(GateDenial::AdminRequired);
    }
    Ok(claims)
}

/// An authenticated caller.
#[derive(Debug, Clone)]
pub struct AuthUser(pub IdentityClaims);

/// An authenticated caller holding the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub IdentityClaims);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = GateDenial;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_auth(&parts.headers, &state.auth_config).map(AuthUser)
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = GateDenial;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_admin(&parts.headers, &state.auth_config).map(AdminUser)
    }
}
