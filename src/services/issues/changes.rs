use crate::models::issue::Issue;
use crate::services::issues::models::UpdateIssueRequest;
use chrono::{DateTime, Utc};
use mongodb::bson::{self, doc, Bson, Document};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ChangesError {
    #[error("cannot cast {0} to a boolean for open")]
    UncastableOpen(String),
}

/**
 * partial update decided once at the request boundary
 * None leaves the stored field alone, Some overwrites it
 */
#[derive(Debug, Default, Clone, PartialEq)]
pub struct IssueChanges {
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub status_text: Option<String>,
    pub open: Option<bool>,
}

impl IssueChanges {
    /// Required text fields can't be blanked, so an empty value counts as absent for them.
    pub fn from_request(request: &UpdateIssueRequest) -> Result<Self, ChangesError> {
        let required = |value: &Option<String>| value.clone().filter(|text| !text.is_empty());

        Ok(IssueChanges {
            issue_title: required(&request.issue_title),
            issue_text: required(&request.issue_text),
            created_by: required(&request.created_by),
            assigned_to: request.assigned_to.clone(),
            status_text: request.status_text.clone(),
            open: cast_open(request.open.as_ref())?,
        })
    }

    /**
     * true when no field carries a non-empty value
     * blanking fields alone counts as nothing to update, open does not
     */
    pub fn is_blank(&self) -> bool {
        self.fields().iter().all(|(_, value)| match value {
            None => true,
            Some(Bson::String(text)) => text.is_empty(),
            Some(_) => false,
        })
    }

    fn fields(&self) -> Vec<(&'static str, Option<Bson>)> {
        let text = |value: &Option<String>| value.clone().map(Bson::String);

        vec![
            ("issue_title", text(&self.issue_title)),
            ("issue_text", text(&self.issue_text)),
            ("created_by", text(&self.created_by)),
            ("assigned_to", text(&self.assigned_to)),
            ("status_text", text(&self.status_text)),
            ("open", self.open.map(Bson::Boolean)),
        ]
    }

    /**
     * build the $set update
     * prefix addresses an embedded element, e.g. "issues.$."
     */
    pub fn set_document(
        &self,
        prefix: &str,
        now: DateTime<Utc>,
    ) -> Result<Document, bson::ser::Error> {
        let mut set = Document::new();
        for (field, value) in self.fields() {
            if let Some(value) = value {
                set.insert(format!("{prefix}{field}"), value);
            }
        }
        set.insert(format!("{prefix}updated_on"), bson::to_bson(&now)?);

        Ok(doc! { "$set": set })
    }

    pub fn apply_to(&self, issue: &mut Issue, now: DateTime<Utc>) {
        if let Some(value) = &self.issue_title {
            issue.issue_title = value.clone();
        }
        if let Some(value) = &self.issue_text {
            issue.issue_text = value.clone();
        }
        if let Some(value) = &self.created_by {
            issue.created_by = value.clone();
        }
        if let Some(value) = &self.assigned_to {
            issue.assigned_to = value.clone();
        }
        if let Some(value) = &self.status_text {
            issue.status_text = value.clone();
        }
        if let Some(value) = self.open {
            issue.open = value;
        }
        issue.updated_on = now;
    }
}

// form-style clients send "false" rather than false
fn cast_open(raw: Option<&Value>) -> Result<Option<bool>, ChangesError> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(flag)) => Ok(Some(*flag)),
        Some(Value::String(text)) => match text.as_str() {
            "" => Ok(None),
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            _ => Err(ChangesError::UncastableOpen(text.clone())),
        },
        Some(other) => Err(ChangesError::UncastableOpen(other.to_string())),
    }
}
