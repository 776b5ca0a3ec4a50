//! Shared application state.
//!
//! Everything a handler needs — repositories, the auth service, the
//! mailer — is constructed once and injected here, so tests can swap
//! in an in-memory database and a recording mailer.

use std::sync::Arc;

use redress_auth::{AuthConfig, AuthService};
use redress_db::repository::{SurrealComplaintRepository, SurrealUserRepository};
use surrealdb::Surreal;
use surrealdb::engine::any::Any;

use crate::mail::Mailer;

#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService<SurrealUserRepository<Any>>,
    pub auth_config: AuthConfig,
    pub complaints: SurrealComplaintRepository<Any>,
    pub mailer: Arc<dyn Mailer>,
    /// Recipient for complaint notifications.
    pub admin_email: String,
}

impl AppState {
    pub fn new(
        db: Surreal<Any>,
        auth_config: AuthConfig,
        mailer: Arc<dyn Mailer>,
        admin_email: String,
    ) -> Self {
        let users = SurrealUserRepository::new(db.clone());
        let complaints = SurrealComplaintRepository::new(db);
        Self {
            auth: AuthService::new(users, auth_config.clone()),
            auth_config,
            complaints,
            mailer,
            admin_email,
        }
    }
}
