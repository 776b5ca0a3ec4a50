//! Redress Core — domain models, repository traits, and shared error
//! types for the complaint-management service.

pub mod error;
pub mod models;
pub mod repository;

pub use error::{CoreError, CoreResult};
