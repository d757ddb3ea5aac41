use crate::error::StoreError;
use crate::models::issue::Issue;
use crate::services::issues::{changes::IssueChanges, query_filter::IssueFilter};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use std::str::FromStr;

/// How issues are laid out in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageVariant {
    /// One collection of issues grouped by their `issue_title`.
    Flat,
    /// One document per project owning an array of issues.
    Embedded,
}

impl FromStr for StorageVariant {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "flat" => Ok(StorageVariant::Flat),
            "embedded" => Ok(StorageVariant::Embedded),
            _ => Err(()),
        }
    }
}

/**
 * result of storing a new issue
 * the embedded layout reports whether the parent project had to be created
 */
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    Stored(Issue),
    CreatedProject(Issue),
    AttachedToProject(Issue),
}

impl CreateOutcome {
    pub fn issue(&self) -> &Issue {
        match self {
            CreateOutcome::Stored(issue)
            | CreateOutcome::CreatedProject(issue)
            | CreateOutcome::AttachedToProject(issue) => issue,
        }
    }

    pub fn into_issue(self) -> Issue {
        match self {
            CreateOutcome::Stored(issue)
            | CreateOutcome::CreatedProject(issue)
            | CreateOutcome::AttachedToProject(issue) => issue,
        }
    }
}

/**
 * storage contract used by the issue routes
 * update_one/delete_one return false when the id does not resolve
 */
#[async_trait]
pub trait IssueStore: Send + Sync {
    fn variant(&self) -> StorageVariant;

    async fn ping(&self) -> Result<(), StoreError>;

    async fn find(&self, project: &str, filter: &IssueFilter) -> Result<Vec<Issue>, StoreError>;

    async fn insert(&self, project: &str, issue: Issue) -> Result<CreateOutcome, StoreError>;

    async fn update_one(
        &self,
        project: &str,
        id: ObjectId,
        changes: &IssueChanges,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError>;

    async fn delete_one(&self, project: &str, id: ObjectId) -> Result<bool, StoreError>;
}
