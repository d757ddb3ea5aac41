use crate::error::StoreError;
use crate::models::issue::Issue;
use crate::services::db::store::{CreateOutcome, IssueStore, StorageVariant};
use crate::services::issues::{changes::IssueChanges, query_filter::IssueFilter};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId, Document};
use mongodb::{Collection, Database};
use tracing::debug;

/**
 * every issue in a single "issues" collection
 * the project is whatever the issue_title says
 */
pub struct FlatIssueStore {
    db: Database,
    issues: Collection<Issue>,
}

impl FlatIssueStore {
    pub fn new(db: &Database) -> Self {
        FlatIssueStore {
            db: db.clone(),
            issues: db.collection("issues"),
        }
    }
}

// the id alone addresses an issue, whatever the path says
fn id_selector(id: ObjectId) -> Document {
    doc! { "_id": id }
}

pub fn update_request(
    id: ObjectId,
    changes: &IssueChanges,
    now: DateTime<Utc>,
) -> Result<(Document, Document), bson::ser::Error> {
    Ok((id_selector(id), changes.set_document("", now)?))
}

#[async_trait]
impl IssueStore for FlatIssueStore {
    fn variant(&self) -> StorageVariant {
        StorageVariant::Flat
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn find(&self, project: &str, filter: &IssueFilter) -> Result<Vec<Issue>, StoreError> {
        let Some(query) = filter.find_document(project)? else {
            debug!("Filter for {} contradicts its grouping, nothing to find", project);
            return Ok(vec![]);
        };

        let cursor = self.issues.find(query).await?;
        let issues: Vec<Issue> = cursor.try_collect().await?;
        Ok(issues)
    }

    async fn insert(&self, _project: &str, issue: Issue) -> Result<CreateOutcome, StoreError> {
        self.issues.insert_one(&issue).await?;
        Ok(CreateOutcome::Stored(issue))
    }

    async fn update_one(
        &self,
        _project: &str,
        id: ObjectId,
        changes: &IssueChanges,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let (filter, update) = update_request(id, changes, now)?;
        let updated = self.issues.find_one_and_update(filter, update).await?;
        Ok(updated.is_some())
    }

    async fn delete_one(&self, _project: &str, id: ObjectId) -> Result<bool, StoreError> {
        let result = self.issues.delete_one(id_selector(id)).await?;
        Ok(result.deleted_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_is_selected_by_id_and_sets_top_level_fields() {
        let id = ObjectId::new();
        let now = Utc::now();
        let changes = IssueChanges {
            status_text: Some("Closed".to_string()),
            open: Some(false),
            ..Default::default()
        };

        let (filter, update) = update_request(id, &changes, now).unwrap();

        assert_eq!(filter, doc! { "_id": id });
        assert_eq!(
            update,
            doc! { "$set": {
                "status_text": "Closed",
                "open": false,
                "updated_on": bson::to_bson(&now).unwrap(),
            } }
        );
    }

    #[test]
    fn empty_update_only_refreshes_updated_on() {
        let id = ObjectId::new();
        let now = Utc::now();

        let (_, update) = update_request(id, &IssueChanges::default(), now).unwrap();
        assert_eq!(
            update,
            doc! { "$set": { "updated_on": bson::to_bson(&now).unwrap() } }
        );
    }

    #[test]
    fn delete_is_selected_by_id() {
        let id = ObjectId::new();
        assert_eq!(id_selector(id), doc! { "_id": id });
    }
}
