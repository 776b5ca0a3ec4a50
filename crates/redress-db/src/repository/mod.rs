//! SurrealDB repository implementations.

mod complaint;
mod user;

pub use complaint::SurrealComplaintRepository;
pub use user::SurrealUserRepository;
