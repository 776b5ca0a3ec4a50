//! Server configuration, loaded from the environment.

use redress_auth::AuthConfig;
use redress_db::DbConfig;

use crate::mail::MailConfig;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub db: DbConfig,
    pub auth: AuthConfig,
    pub mail: MailConfig,
    /// Recipient for complaint notifications.
    pub admin_email: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".into(),
            db: DbConfig::default(),
            auth: AuthConfig::default(),
            mail: MailConfig::default(),
            admin_email: "admin@example.com".into(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl ServerConfig {
    /// Assemble the configuration from environment variables, falling
    /// back to the defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let mut auth = AuthConfig::new(std::env::var("JWT_SECRET").ok().filter(|v| !v.is_empty()));
        if let Some(lifetime) = std::env::var("TOKEN_LIFETIME_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            auth.token_lifetime_secs = lifetime;
        }

        let smtp_user = env_or("SMTP_USER", "");
        Self {
            bind_addr: env_or("BIND_ADDR", &defaults.bind_addr),
            db: DbConfig {
                url: env_or("DATABASE_URL", &defaults.db.url),
                namespace: env_or("DB_NS", &defaults.db.namespace),
                database: env_or("DB_NAME", &defaults.db.database),
                username: env_or("DB_USER", &defaults.db.username),
                password: env_or("DB_PASS", &defaults.db.password),
            },
            auth,
            mail: MailConfig {
                host: env_or("SMTP_HOST", &defaults.mail.host),
                port: env_or("SMTP_PORT", "587").parse().unwrap_or(587),
                from: env_or("SMTP_FROM", &smtp_user),
                username: smtp_user,
                password: env_or("SMTP_PASS", ""),
            },
            admin_email: env_or("ADMIN_EMAIL", &defaults.admin_email),
        }
    }
}
