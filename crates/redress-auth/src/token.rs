//! JWT identity token issuance and verification.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use redress_core::models::user::{Role, UserPublic};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;

/// JWT claims embedded in every identity token.
///
/// Claims are trusted as-is for the token's lifetime — including the
/// role, which is not re-checked against storage on each request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentityClaims {
    /// Subject — user ID (UUID string).
    pub sub: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    /// Issued-at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
}

impl IdentityClaims {
    /// Parse the subject claim back into a user ID.
    pub fn user_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.sub)
            .map_err(|e| AuthError::TokenInvalid(format!("bad subject: {e}")))
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Issue a signed HS256 JWT for the given user.
pub fn issue_token(user: &UserPublic, config: &AuthConfig) -> Result<String, AuthError> {
    let now = Utc::now().timestamp();
    let claims = IdentityClaims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        name: user.name.clone(),
        role: user.role,
        iat: now,
        exp: now + config.token_lifetime_secs as i64,
    };

    let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
    jsonwebtoken::encode(&Header::default(), &claims, &key)
        .map_err(|e| AuthError::Crypto(format!("JWT encode: {e}")))
}

/// Decode and verify an HS256 JWT identity token.
pub fn decode_token(token: &str, config: &AuthConfig) -> Result<IdentityClaims, AuthError> {
    let key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
    let validation = Validation::default();

    jsonwebtoken::decode::<IdentityClaims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::TokenInvalid(e.to_string()),
        })
}

/// Verify a token, swallowing every failure into `None`.
///
/// This is the request-path contract: a bad token is simply an
/// unauthenticated request, never an error that propagates.
pub fn verify_token(token: &str, config: &AuthConfig) -> Option<IdentityClaims> {
    decode_token(token, config).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_user() -> UserPublic {
        UserPublic {
            id: Uuid::new_v4(),
            email: "alice@example.com".into(),
            name: "Alice".into(),
            role: Role::User,
            created_at: Utc::now(),
        }
    }

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".into(),
            token_lifetime_secs: 604_800,
        }
    }

    #[test]
    fn jwt_roundtrip() {
        let config = test_config();
        let user = test_user();

        let token = issue_token(&user, &config).unwrap();
        let claims = decode_token(&token, &config).unwrap();

        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.name, "Alice");
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.user_id().unwrap(), user.id);
        assert_eq!(claims.exp - claims.iat, 604_800);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let config = test_config();
        let token = issue_token(&test_user(), &config).unwrap();

        let other = AuthConfig {
            jwt_secret: "a-different-secret".into(),
            ..config
        };
        assert!(matches!(
            decode_token(&token, &other),
            Err(AuthError::TokenInvalid(_))
        ));
        assert!(verify_token(&token, &other).is_none());
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = test_config();
        let now = Utc::now().timestamp();
        let claims = IdentityClaims {
            sub: Uuid::new_v4().to_string(),
            email: "alice@example.com".into(),
            name: "Alice".into(),
            role: Role::User,
            iat: now - 7_200,
            exp: now - 3_600,
        };
        let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let token = jsonwebtoken::encode(&Header::default(), &claims, &key).unwrap();

        assert!(matches!(
            decode_token(&token, &config),
            Err(AuthError::TokenExpired)
        ));
        assert!(verify_token(&token, &config).is_none());
    }

    #[test]
    fn garbage_is_swallowed_into_none() {
        let config = test_config();
        assert!(verify_token("not.a.jwt", &config).is_none());
        assert!(verify_token("", &config).is_none());
    }

    #[test]
    fn admin_claims_report_admin() {
        let config = test_config();
        let admin = UserPublic {
            role: Role::Admin,
            ..test_user()
        };
        let token = issue_token(&admin, &config).unwrap();
        let claims = decode_token(&token, &config).unwrap();
        assert!(claims.is_admin());
    }
}
