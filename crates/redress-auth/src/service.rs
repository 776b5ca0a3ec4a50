//! Authentication service — registration and login orchestration.

use redress_core::error::{CoreError, CoreResult};
use redress_core::models::user::{CreateUser, Role, UserPublic};
use redress_core::repository::UserRepository;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token;

/// Input for the registration flow.
#[derive(Debug)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Input for the login flow.
#[derive(Debug)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Successful authentication result.
#[derive(Debug)]
pub struct AuthOutput {
    /// Signed JWT identity token.
    pub token: String,
    pub user: UserPublic,
}

/// Authentication service.
///
/// Generic over the repository implementation so that the auth layer
/// has no dependency on the database crate.
#[derive(Clone)]
pub struct AuthService<U: UserRepository> {
    users: U,
    config: AuthConfig,
}

impl<U: UserRepository> AuthService<U> {
    pub fn new(users: U, config: AuthConfig) -> Self {
        Self { users, config }
    }

    /// Create an account and issue a token for it.
    ///
    /// New accounts always get the `user` role; administrators are
    /// provisioned out of band.
    pub async fn register(&self, input: RegisterInput) -> CoreResult<AuthOutput> {
        let user = self
            .users
            .create(CreateUser {
                email: input.email,
                name: input.name,
                password: input.password,
                role: Role::User,
            })
            .await?;

        let user = UserPublic::from(user);
        let token = token::issue_token(&user, &self.config)?;

        Ok(AuthOutput { token, user })
    }

    /// Authenticate with email + password and issue a token.
    ///
    /// Lookup failure and password mismatch collapse into the same
    /// error so responses carry no email-existence oracle.
    pub async fn login(&self, input: LoginInput) -> CoreResult<AuthOutput> {
        let user = match self.users.get_by_email(&input.email).await {
            Ok(user) => user,
            Err(CoreError::NotFound { .. }) => {
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => return Err(e),
        };

        let valid = password::verify_password(&input.password, &user.password_hash)?;
        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        let user = UserPublic::from(user);
        let token = token::issue_token(&user, &self.config)?;

        Ok(AuthOutput { token, user })
    }
}
