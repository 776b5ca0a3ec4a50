//! SurrealDB implementation of [`ComplaintRepository`].
//!
//! Status updates are two separate single-document operations: the
//! read that records the previous status and the write of the new one
//! are not wrapped in a transaction, so concurrent updates race with
//! last-write-wins semantics.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use redress_core::error::CoreResult;
use redress_core::models::complaint::{
    Category, Complaint, ComplaintFilter, ComplaintWithSubmitter, CreateComplaint,
    MAX_DESCRIPTION_LEN, MAX_TITLE_LEN, Priority, Status, StatusChange,
};
use redress_core::models::user::UserSummary;
use redress_core::repository::ComplaintRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct ComplaintRow {
    title: String,
    description: String,
    category: String,
    priority: String,
    status: String,
    date_submitted: DateTime<Utc>,
    user_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct ComplaintRowWithId {
    record_id: String,
    title: String,
    description: String,
    category: String,
    priority: String,
    status: String,
    date_submitted: DateTime<Utc>,
    user_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Row struct for the submitter join.
#[derive(Debug, SurrealValue)]
struct SubmitterRow {
    name: String,
    email: String,
}

fn parse_category(s: &str) -> Result<Category, DbError> {
    match s {
        "Product" => Ok(Category::Product),
        "Service" => Ok(Category::Service),
        "Support" => Ok(Category::Support),
        "Technical" => Ok(Category::Technical),
        "Other" => Ok(Category::Other),
        other => Err(DbError::Decode(format!("unknown category: {other}"))),
    }
}

fn parse_priority(s: &str) -> Result<Priority, DbError> {
    match s {
        "Low" => Ok(Priority::Low),
        "Medium" => Ok(Priority::Medium),
        "High" => Ok(Priority::High),
        other => Err(DbError::Decode(format!("unknown priority: {other}"))),
    }
}

fn parse_status(s: &str) -> Result<Status, DbError> {
    match s {
        "Pending" => Ok(Status::Pending),
        "In Progress" => Ok(Status::InProgress),
        "Resolved" => Ok(Status::Resolved),
        other => Err(DbError::Decode(format!("unknown status: {other}"))),
    }
}

impl ComplaintRow {
    fn into_complaint(self, id: Uuid) -> Result<Complaint, DbError> {
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| DbError::Decode(format!("invalid owner UUID: {e}")))?;
        Ok(Complaint {
            id,
            title: self.title,
            description: self.description,
            category: parse_category(&self.category)?,
            priority: parse_priority(&self.priority)?,
            status: parse_status(&self.status)?,
            date_submitted: self.date_submitted,
            user_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl ComplaintRowWithId {
    fn try_into_complaint(self) -> Result<Complaint, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| DbError::Decode(format!("invalid owner UUID: {e}")))?;
        Ok(Complaint {
            id,
            title: self.title,
            description: self.description,
            category: parse_category(&self.category)?,
            priority: parse_priority(&self.priority)?,
            status: parse_status(&self.status)?,
            date_submitted: self.date_submitted,
            user_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn validate(title: &str, description: &str) -> Result<(), DbError> {
    if title.is_empty() {
        return Err(DbError::Validation {
            message: "title is required".into(),
        });
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(DbError::Validation {
            message: format!("title cannot be more than {MAX_TITLE_LEN} characters"),
        });
    }
    if description.is_empty() {
        return Err(DbError::Validation {
            message: "description is required".into(),
        });
    }
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(DbError::Validation {
            message: format!("description cannot be more than {MAX_DESCRIPTION_LEN} characters"),
        });
    }
    Ok(())
}

/// SurrealDB implementation of the Complaint repository.
#[derive(Clone)]
pub struct SurrealComplaintRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealComplaintRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    /// Look up name/email for each distinct owner in the listing.
    async fn submitters_for(
        &self,
        complaints: &[Complaint],
    ) -> Result<HashMap<Uuid, UserSummary>, DbError> {
        let mut submitters = HashMap::new();
        for complaint in complaints {
            if submitters.contains_key(&complaint.user_id) {
                continue;
            }
            let mut result = self
                .db
                .query("SELECT name, email FROM type::record('user', $id)")
                .bind(("id", complaint.user_id.to_string()))
                .await?;
            let rows: Vec<SubmitterRow> = result.take(0)?;
            if let Some(row) = rows.into_iter().next() {
                submitters.insert(
                    complaint.user_id,
                    UserSummary {
                        name: row.name,
                        email: row.email,
                    },
                );
            }
        }
        Ok(submitters)
    }
}

impl<C: Connection> ComplaintRepository for SurrealComplaintRepository<C> {
    async fn create(&self, input: CreateComplaint) -> CoreResult<Complaint> {
        let title = input.title.trim().to_string();
        let description = input.description.trim().to_string();
        validate(&title, &description)?;

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        // Status is forced here: callers cannot create anything but a
        // Pending complaint. The submission time comes from the schema
        // default.
        let result = self
            .db
            .query(
                "CREATE type::record('complaint', $id) SET \
                 title = $title, description = $description, \
                 category = $category, priority = $priority, \
                 status = $status, user_id = $user_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("title", title))
            .bind(("description", description))
            .bind(("category", input.category.as_str().to_string()))
            .bind(("priority", input.priority.as_str().to_string()))
            .bind(("status", Status::Pending.as_str().to_string()))
            .bind(("user_id", input.user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<ComplaintRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "complaint".into(),
            id: id_str,
        })?;

        Ok(row.into_complaint(id)?)
    }

    async fn list_all(&self, filter: ComplaintFilter) -> CoreResult<Vec<ComplaintWithSubmitter>> {
        let mut wheres: Vec<&str> = Vec::new();
        if filter.status.is_some() {
            wheres.push("status = $status");
        }
        if filter.priority.is_some() {
            wheres.push("priority = $priority");
        }
        if filter.category.is_some() {
            wheres.push("category = $category");
        }

        let mut query =
            String::from("SELECT meta::id(id) AS record_id, * FROM complaint");
        if !wheres.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&wheres.join(" AND "));
        }
        query.push_str(" ORDER BY date_submitted DESC");

        let mut builder = self.db.query(&query);
        if let Some(status) = filter.status {
            builder = builder.bind(("status", status.as_str().to_string()));
        }
        if let Some(priority) = filter.priority {
            builder = builder.bind(("priority", priority.as_str().to_string()));
        }
        if let Some(category) = filter.category {
            builder = builder.bind(("category", category.as_str().to_string()));
        }

        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<ComplaintRowWithId> = result.take(0).map_err(DbError::from)?;

        let complaints = rows
            .into_iter()
            .map(|row| row.try_into_complaint())
            .collect::<Result<Vec<_>, DbError>>()?;

        let submitters = self.submitters_for(&complaints).await?;

        Ok(complaints
            .into_iter()
            .map(|complaint| {
                let submitter = submitters.get(&complaint.user_id).cloned();
                ComplaintWithSubmitter {
                    complaint,
                    submitter,
                }
            })
            .collect())
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> CoreResult<Vec<Complaint>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM complaint \
                 WHERE user_id = $user_id \
                 ORDER BY date_submitted DESC",
            )
            .bind(("user_id", owner_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ComplaintRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows
            .into_iter()
            .map(|row| row.try_into_complaint())
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn update_status(&self, id: Uuid, new_status: Status) -> CoreResult<StatusChange> {
        let id_str = id.to_string();

        // Read the current status first; the notification contract
        // wants the value observed at the start of this call.
        let mut result = self
            .db
            .query("SELECT * FROM type::record('complaint', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let rows: Vec<ComplaintRow> = result.take(0).map_err(DbError::from)?;
        let current = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "complaint".into(),
            id: id_str.clone(),
        })?;
        let previous = parse_status(&current.status)?;

        if !previous.transition_allowed(new_status) {
            return Err(DbError::Validation {
                message: format!("transition from {previous} to {new_status} is not permitted"),
            }
            .into());
        }

        let result = self
            .db
            .query(
                "UPDATE type::record('complaint', $id) SET \
                 status = $status, updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("status", new_status.as_str().to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;
        let rows: Vec<ComplaintRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "complaint".into(),
            id: id_str,
        })?;

        Ok(StatusChange {
            complaint: row.into_complaint(id)?,
            previous,
        })
    }

    async fn delete(&self, id: Uuid) -> CoreResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("DELETE type::record('complaint', $id) RETURN BEFORE")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ComplaintRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "complaint".into(),
                id: id_str,
            }
            .into());
        }

        Ok(())
    }
}
