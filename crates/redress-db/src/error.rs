//! Database-specific error types and conversions.

use redress_core::error::CoreError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Malformed record: {0}")]
    Decode(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Record already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Cryptography error: {0}")]
    Crypto(String),
}

impl From<DbError> for CoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => CoreError::NotFound { entity, id },
            DbError::AlreadyExists { entity } => CoreError::AlreadyExists { entity },
            DbError::Validation { message } => CoreError::Validation { message },
            DbError::Crypto(msg) => CoreError::Crypto(msg),
            other => CoreError::Database(other.to_string()),
        }
    }
}
