use crate::error::StoreError;
use crate::models::{issue::Issue, project::Project};
use crate::services::db::store::{CreateOutcome, IssueStore, StorageVariant};
use crate::services::issues::{changes::IssueChanges, query_filter::IssueFilter};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId, Bson, Document};
use mongodb::options::IndexOptions;
use mongodb::{Collection, Database, IndexModel};

// positional prefix for the array element matched by the selector
const MATCHED_ISSUE: &str = "issues.$.";

/**
 * one document per project in "projects"
 * issues live in the project's issues array
 */
pub struct EmbeddedIssueStore {
    db: Database,
    projects: Collection<Project>,
}

impl EmbeddedIssueStore {
    pub fn new(db: &Database) -> Self {
        EmbeddedIssueStore {
            db: db.clone(),
            projects: db.collection("projects"),
        }
    }

    /**
     * one parent document per project name
     * concurrent first inserts otherwise could upsert two of them
     */
    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        self.projects.create_index(project_name_index()).await?;
        Ok(())
    }
}

pub fn project_name_index() -> IndexModel {
    IndexModel::builder()
        .keys(doc! { "name": 1 })
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

/// Upserting push: the first issue creates its project.
pub fn insert_request(
    project: &str,
    issue: &Issue,
) -> Result<(Document, Document), bson::ser::Error> {
    Ok((
        doc! { "name": project },
        doc! { "$push": { "issues": bson::to_bson(issue)? } },
    ))
}

pub fn insert_outcome(upserted_id: Option<Bson>, issue: Issue) -> CreateOutcome {
    match upserted_id {
        Some(_) => CreateOutcome::CreatedProject(issue),
        None => CreateOutcome::AttachedToProject(issue),
    }
}

// selects the project only if it holds the issue
fn issue_selector(project: &str, id: ObjectId) -> Document {
    doc! { "name": project, "issues._id": id }
}

pub fn update_request(
    project: &str,
    id: ObjectId,
    changes: &IssueChanges,
    now: DateTime<Utc>,
) -> Result<(Document, Document), bson::ser::Error> {
    Ok((
        issue_selector(project, id),
        changes.set_document(MATCHED_ISSUE, now)?,
    ))
}

pub fn delete_request(project: &str, id: ObjectId) -> (Document, Document) {
    (
        issue_selector(project, id),
        doc! { "$pull": { "issues": { "_id": id } } },
    )
}

/**
 * select the project, flatten its issues, then one $match per field
 * the output is bare issues without the project wrapper
 */
pub fn issue_pipeline(
    project: &str,
    filter: &IssueFilter,
) -> Result<Vec<Document>, bson::ser::Error> {
    let mut pipeline = vec![
        doc! { "$match": { "name": project } },
        doc! { "$unwind": "$issues" },
        doc! { "$replaceRoot": { "newRoot": "$issues" } },
    ];
    pipeline.extend(filter.match_stages()?);
    Ok(pipeline)
}

#[async_trait]
impl IssueStore for EmbeddedIssueStore {
    fn variant(&self) -> StorageVariant {
        StorageVariant::Embedded
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn find(&self, project: &str, filter: &IssueFilter) -> Result<Vec<Issue>, StoreError> {
        let pipeline = issue_pipeline(project, filter)?;
        let mut cursor = self.projects.aggregate(pipeline).await?;

        let mut issues = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            issues.push(bson::from_document::<Issue>(document)?);
        }
        Ok(issues)
    }

    async fn insert(&self, project: &str, issue: Issue) -> Result<CreateOutcome, StoreError> {
        let (filter, update) = insert_request(project, &issue)?;
        let result = self.projects.update_one(filter, update).upsert(true).await?;
        Ok(insert_outcome(result.upserted_id, issue))
    }

    async fn update_one(
        &self,
        project: &str,
        id: ObjectId,
        changes: &IssueChanges,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let (filter, update) = update_request(project, id, changes, now)?;
        let result = self.projects.update_one(filter, update).await?;
        Ok(result.matched_count > 0)
    }

    async fn delete_one(&self, project: &str, id: ObjectId) -> Result<bool, StoreError> {
        let (filter, update) = delete_request(project, id);
        let result = self.projects.update_one(filter, update).await?;
        // a matched project that pulled nothing still counts as not found
        Ok(result.modified_count > 0)
    }
}
