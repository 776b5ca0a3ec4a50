//! Redress Server — application entry point.

use std::sync::Arc;

use redress_server::config::ServerConfig;
use redress_server::mail::SmtpMailer;
use redress_server::routes::build_router;
use redress_server::state::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("redress=info".parse()?))
        .json()
        .init();

    let config = ServerConfig::from_env();
    if config.auth.uses_fallback_secret() {
        tracing::warn!(
            "JWT_SECRET is not set; signing tokens with the built-in fallback secret"
        );
    }

    let db = redress_db::DbManager::connect(&config.db).await?;
    redress_db::run_migrations(db.client()).await?;

    let mailer = Arc::new(SmtpMailer::new(&config.mail)?);
    let state = AppState::new(
        db.client().clone(),
        config.auth.clone(),
        mailer,
        config.admin_email.clone(),
    );

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "Starting redress server");
    axum::serve(listener, build_router(state)).await?;

    Ok(())
}
