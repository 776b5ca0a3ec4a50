//! Authentication configuration.

/// Signing secret used when none is configured.
///
/// Deployments that omit `JWT_SECRET` keep working, at the cost of a
/// well-known key. [`AuthConfig::uses_fallback_secret`] lets the
/// server log a warning at startup when this is in effect.
pub const FALLBACK_JWT_SECRET: &str = "your-secret-key-change-in-production";

/// Configuration for token issuance and verification.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC secret for JWT signing and verification.
    pub jwt_secret: String,
    /// Token lifetime in seconds (default: 604_800 = 7 days).
    pub token_lifetime_secs: u64,
}

impl AuthConfig {
    /// Build a config from an optional configured secret, falling back
    /// to [`FALLBACK_JWT_SECRET`].
    pub fn new(jwt_secret: Option<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.unwrap_or_else(|| FALLBACK_JWT_SECRET.to_string()),
            ..Self::default()
        }
    }

    /// True when tokens are being signed with the built-in secret.
    pub fn uses_fallback_secret(&self) -> bool {
        self.jwt_secret == FALLBACK_JWT_SECRET
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: FALLBACK_JWT_SECRET.into(),
            token_lifetime_secs: 604_800,
        }
    }
}
