//! One-off administrative bootstrap: insert the privileged user
//! directly into storage, outside the HTTP surface.
//!
//! Run with the same environment as the server:
//! `cargo run --bin seed-admin`

use redress_core::error::CoreError;
use redress_core::models::user::{CreateUser, Role};
use redress_core::repository::UserRepository;
use redress_db::repository::SurrealUserRepository;
use redress_server::config::ServerConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("redress=info".parse()?))
        .init();

    let config = ServerConfig::from_env();
    let email = config.admin_email.clone();
    let password =
        std::env::var("SEED_ADMIN_PASSWORD").unwrap_or_else(|_| "admin123456".to_string());
    let name = std::env::var("SEED_ADMIN_NAME")
        .unwrap_or_else(|_| "System Administrator".to_string());

    let db = redress_db::DbManager::connect(&config.db).await?;
    redress_db::run_migrations(db.client()).await?;

    let users = SurrealUserRepository::new(db.client().clone());
    match users.get_by_email(&email).await {
        Ok(_) => {
            tracing::info!(%email, "Admin user already exists");
            return Ok(());
        }
        Err(CoreError::NotFound { .. }) => {}
        Err(err) => return Err(err.into()),
    }

    let admin = users
        .create(CreateUser {
            email: email.clone(),
            name,
            password,
            role: Role::Admin,
        })
        .await?;

    tracing::info!(%email, id = %admin.id, "Admin user created successfully");

    Ok(())
}
