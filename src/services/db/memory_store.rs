use crate::error::StoreError;
use crate::models::{issue::Issue, project::Project};
use crate::services::db::store::{CreateOutcome, IssueStore, StorageVariant};
use crate::services::issues::{changes::IssueChanges, query_filter::IssueFilter};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

// the flat layout keeps everything in one bucket
const FLAT_BUCKET: &str = "issues";

/**
 * process-local store following either layout's rules
 * flat: grouped by issue_title, addressed by id alone
 * embedded: grouped and addressed by project name
 */
pub struct InMemoryIssueStore {
    variant: StorageVariant,
    projects: RwLock<Vec<Project>>,
}

impl InMemoryIssueStore {
    pub fn new(variant: StorageVariant) -> Self {
        InMemoryIssueStore {
            variant,
            projects: RwLock::new(Vec::new()),
        }
    }

    fn in_scope(&self, bucket: &Project, project: &str, issue: &Issue) -> bool {
        match self.variant {
            StorageVariant::Flat => issue.issue_title == project,
            StorageVariant::Embedded => bucket.name == project,
        }
    }

    fn addresses(&self, bucket: &Project, project: &str) -> bool {
        match self.variant {
            StorageVariant::Flat => true,
            StorageVariant::Embedded => bucket.name == project,
        }
    }

    #[cfg(test)]
    async fn project_names(&self) -> Vec<String> {
        self.projects
            .read()
            .await
            .iter()
            .map(|project| project.name.clone())
            .collect()
    }
}

#[async_trait]
impl IssueStore for InMemoryIssueStore {
    fn variant(&self) -> StorageVariant {
        self.variant
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn find(&self, project: &str, filter: &IssueFilter) -> Result<Vec<Issue>, StoreError> {
        let projects = self.projects.read().await;
        Ok(projects
            .iter()
            .flat_map(move |bucket| {
                bucket
                    .issues
                    .iter()
                    .filter(move |issue| self.in_scope(bucket, project, issue))
            })
            .filter(|issue| filter.matches(issue))
            .cloned()
            .collect())
    }

    async fn insert(&self, project: &str, issue: Issue) -> Result<CreateOutcome, StoreError> {
        let name = match self.variant {
            StorageVariant::Flat => FLAT_BUCKET,
            StorageVariant::Embedded => project,
        };

        let mut projects = self.projects.write().await;
        let created = match projects.iter().position(|bucket| bucket.name == name) {
            Some(index) => {
                projects[index].issues.push(issue.clone());
                false
            }
            None => {
                let mut bucket = Project::new(name);
                bucket.issues.push(issue.clone());
                projects.push(bucket);
                true
            }
        };

        Ok(match (self.variant, created) {
            (StorageVariant::Flat, _) => CreateOutcome::Stored(issue),
            (StorageVariant::Embedded, true) => CreateOutcome::CreatedProject(issue),
            (StorageVariant::Embedded, false) => CreateOutcome::AttachedToProject(issue),
        })
    }

    async fn update_one(
        &self,
        project: &str,
        id: ObjectId,
        changes: &IssueChanges,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let mut projects = self.projects.write().await;
        let target = projects
            .iter_mut()
            .filter(|bucket| self.addresses(bucket, project))
            .flat_map(|bucket| bucket.issues.iter_mut())
            .find(|issue| issue.id == id);

        match target {
            Some(issue) => {
                changes.apply_to(issue, now);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_one(&self, project: &str, id: ObjectId) -> Result<bool, StoreError> {
        let mut projects = self.projects.write().await;
        for bucket in projects.iter_mut() {
            if !self.addresses(bucket, project) {
                continue;
            }
            if let Some(position) = bucket.issues.iter().position(|issue| issue.id == id) {
                bucket.issues.remove(position);
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(title: &str) -> Issue {
        Issue::new(
            title.to_string(),
            "text".to_string(),
            "alice".to_string(),
            String::new(),
            String::new(),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn embedded_reports_project_creation_once() {
        let store = InMemoryIssueStore::new(StorageVariant::Embedded);

        let first = store.insert("apitest", issue("one")).await.unwrap();
        let second = store.insert("apitest", issue("two")).await.unwrap();

        assert!(matches!(first, CreateOutcome::CreatedProject(_)));
        assert!(matches!(second, CreateOutcome::AttachedToProject(_)));
        assert_eq!(store.project_names().await, vec!["apitest".to_string()]);
    }

    #[tokio::test]
    async fn embedded_keeps_projects_apart() {
        let store = InMemoryIssueStore::new(StorageVariant::Embedded);
        let stored = store.insert("alpha", issue("one")).await.unwrap().into_issue();
        store.insert("beta", issue("two")).await.unwrap();

        let alpha = store.find("alpha", &IssueFilter::default()).await.unwrap();
        assert_eq!(alpha, vec![stored.clone()]);

        // another project's name can't address the issue
        assert!(!store.delete_one("beta", stored.id).await.unwrap());
        assert!(store.delete_one("alpha", stored.id).await.unwrap());
        assert!(!store.delete_one("alpha", stored.id).await.unwrap());
    }

    #[tokio::test]
    async fn flat_groups_by_issue_title() {
        let store = InMemoryIssueStore::new(StorageVariant::Flat);

        let outcome = store.insert("whatever", issue("apitest")).await.unwrap();
        assert!(matches!(outcome, CreateOutcome::Stored(_)));
        store.insert("whatever", issue("other")).await.unwrap();

        let found = store.find("apitest", &IssueFilter::default()).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].issue_title, "apitest");
        assert!(store
            .find("whatever", &IssueFilter::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn update_applies_changes_and_reports_missing_ids() {
        let store = InMemoryIssueStore::new(StorageVariant::Embedded);
        let stored = store.insert("apitest", issue("one")).await.unwrap().into_issue();
        let later = stored.created_on + chrono::Duration::seconds(1);

        let changes = IssueChanges {
            open: Some(false),
            ..Default::default()
        };
        assert!(store.update_one("apitest", stored.id, &changes, later).await.unwrap());
        assert!(!store
            .update_one("apitest", ObjectId::new(), &changes, later)
            .await
            .unwrap());

        let found = store.find("apitest", &IssueFilter::default()).await.unwrap();
        assert!(!found[0].open);
        assert_eq!(found[0].updated_on, later);
    }
}
