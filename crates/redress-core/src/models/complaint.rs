//! Complaint domain model and the status state machine.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::user::UserSummary;

/// Maximum title length, enforced here and by the schema.
pub const MAX_TITLE_LEN: usize = 100;
/// Maximum description length, enforced here and by the schema.
pub const MAX_DESCRIPTION_LEN: usize = 1000;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Category {
    Product,
    Service,
    Support,
    Technical,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Product,
        Category::Service,
        Category::Support,
        Category::Technical,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Product => "Product",
            Category::Service => "Service",
            Category::Support => "Support",
            Category::Technical => "Technical",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Product" => Ok(Category::Product),
            "Service" => Ok(Category::Service),
            "Support" => Ok(Category::Support),
            "Technical" => Ok(Category::Technical),
            "Other" => Ok(Category::Other),
            other => Err(CoreError::Validation {
                message: format!("unknown category: {other}"),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(Priority::Low),
            "Medium" => Ok(Priority::Medium),
            "High" => Ok(Priority::High),
            other => Err(CoreError::Validation {
                message: format!("unknown priority: {other}"),
            }),
        }
    }
}

/// Complaint lifecycle state.
///
/// `Pending` is the only creation state; there is no terminal state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Status {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Pending, Status::InProgress, Status::Resolved];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "Pending",
            Status::InProgress => "In Progress",
            Status::Resolved => "Resolved",
        }
    }

    /// Transition policy, kept as an explicit table so that tightening
    /// a transition later is a one-line change. Every directed pair,
    /// including self-transitions, is currently permitted.
    pub fn transition_allowed(self, to: Status) -> bool {
        use Status::*;
        matches!(
            (self, to),
            (Pending, Pending)
                | (Pending, InProgress)
                | (Pending, Resolved)
                | (InProgress, Pending)
                | (InProgress, InProgress)
                | (InProgress, Resolved)
                | (Resolved, Pending)
                | (Resolved, InProgress)
                | (Resolved, Resolved)
        )
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Status::Pending),
            "In Progress" => Ok(Status::InProgress),
            "Resolved" => Ok(Status::Resolved),
            other => Err(CoreError::Validation {
                message: format!("unknown status: {other}"),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Complaint {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub status: Status,
    pub date_submitted: DateTime<Utc>,
    /// Owning user; establishes visibility scope for non-admin queries.
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for complaint creation. Status is not accepted here: new
/// complaints always start as `Pending`.
#[derive(Debug, Clone)]
pub struct CreateComplaint {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub user_id: Uuid,
}

/// Equality filters for administrative listings, combined as a
/// conjunction. `None` fields do not constrain the result.
#[derive(Debug, Clone, Default)]
pub struct ComplaintFilter {
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub category: Option<Category>,
}

/// A complaint joined with its submitter, for administrative listings.
#[derive(Debug, Clone, Serialize)]
pub struct ComplaintWithSubmitter {
    #[serde(flatten)]
    pub complaint: Complaint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitter: Option<UserSummary>,
}

/// Result of a status update: the persisted complaint plus the status
/// observed immediately before the write.
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub complaint: Complaint,
    pub previous: Status,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_forms() {
        assert_eq!(
            serde_json::to_string(&Status::InProgress).unwrap(),
            "\"In Progress\""
        );
        assert_eq!(
            serde_json::from_str::<Status>("\"In Progress\"").unwrap(),
            Status::InProgress
        );
        assert_eq!(serde_json::to_string(&Status::Pending).unwrap(), "\"Pending\"");
    }

    #[test]
    fn status_parse_roundtrip() {
        for status in Status::ALL {
            assert_eq!(status.as_str().parse::<Status>().unwrap(), status);
        }
        assert!("pending".parse::<Status>().is_err());
        assert!("Done".parse::<Status>().is_err());
    }

    #[test]
    fn category_and_priority_parse_roundtrip() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        for priority in Priority::ALL {
            assert_eq!(priority.as_str().parse::<Priority>().unwrap(), priority);
        }
        assert!("Hardware".parse::<Category>().is_err());
        assert!("Urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn every_state_is_reachable_from_every_state() {
        for from in Status::ALL {
            for to in Status::ALL {
                assert!(
                    from.transition_allowed(to),
                    "expected {from} -> {to} to be permitted"
                );
            }
        }
    }
}
