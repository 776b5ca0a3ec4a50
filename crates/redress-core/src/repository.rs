//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Implementations live in the
//! database crate; the auth and server crates depend only on these
//! traits so they can be exercised against test doubles or an
//! in-memory engine.

use uuid::Uuid;

use crate::error::CoreResult;
use crate::models::complaint::{
    Complaint, ComplaintFilter, ComplaintWithSubmitter, CreateComplaint, Status, StatusChange,
};
use crate::models::user::{CreateUser, User};

pub trait UserRepository: Send + Sync {
    /// Persist a new user. Fails with [`CoreError::AlreadyExists`] if
    /// the email is taken — the check runs before the insert so the
    /// caller sees a clean validation failure, not a storage conflict.
    ///
    /// [`CoreError::AlreadyExists`]: crate::error::CoreError::AlreadyExists
    fn create(&self, input: CreateUser) -> impl Future<Output = CoreResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CoreResult<User>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = CoreResult<User>> + Send;
}

pub trait ComplaintRepository: Send + Sync {
    /// Validate and persist a new complaint. Status is forced to
    /// `Pending` and the submission time is set at creation; nothing
    /// is persisted on validation failure.
    fn create(&self, input: CreateComplaint) -> impl Future<Output = CoreResult<Complaint>> + Send;

    /// Administrative listing: every complaint matching the filter
    /// conjunction, newest submission first, joined with the
    /// submitter's name and email.
    fn list_all(
        &self,
        filter: ComplaintFilter,
    ) -> impl Future<Output = CoreResult<Vec<ComplaintWithSubmitter>>> + Send;

    /// Complaints owned by one user, newest submission first.
    /// Ownership scoping happens in the query itself, never as a
    /// post-filter.
    fn list_by_owner(
        &self,
        owner_id: Uuid,
    ) -> impl Future<Output = CoreResult<Vec<Complaint>>> + Send;

    /// The state machine's only transition: record the status observed
    /// at the start of the call, then write the new one. No mutation
    /// on a missing complaint or a denied transition.
    fn update_status(
        &self,
        id: Uuid,
        new_status: Status,
    ) -> impl Future<Output = CoreResult<StatusChange>> + Send;

    /// Remove a complaint. Not-found is a distinct failure.
    fn delete(&self, id: Uuid) -> impl Future<Output = CoreResult<()>> + Send;
}
