use crate::models::issue::Issue;
use chrono::{DateTime, Utc};
use mongodb::bson::{self, doc, oid::ObjectId, Bson, Document};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

// editor tooling tends to inject its own query keys
static TOOLING_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".*vscode.+").expect("tooling pattern is valid"));

#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("malformed _id {0:?}")]
    InvalidId(String),

    #[error("invalid value {value:?} for {field}")]
    InvalidValue { field: &'static str, value: String },
}

/**
 * equality constraints parsed from a GET query string
 * a None field puts no constraint on that field
 */
#[derive(Debug, Default, Clone, PartialEq)]
pub struct IssueFilter {
    pub id: Option<ObjectId>,
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub open: Option<bool>,
    pub status_text: Option<String>,
    pub created_on: Option<DateTime<Utc>>,
    pub updated_on: Option<DateTime<Utc>>,
}

impl IssueFilter {
    pub fn from_query(params: &HashMap<String, String>) -> Result<Self, FilterError> {
        let mut filter = IssueFilter::default();

        for (key, value) in params {
            if TOOLING_PARAM.is_match(key) {
                debug!("Dropping tooling query parameter {}", key);
                continue;
            }

            match key.as_str() {
                "_id" => {
                    let id = ObjectId::parse_str(value)
                        .map_err(|_| FilterError::InvalidId(value.clone()))?;
                    filter.id = Some(id);
                }
                "issue_title" => filter.issue_title = Some(value.clone()),
                "issue_text" => filter.issue_text = Some(value.clone()),
                "created_by" => filter.created_by = Some(value.clone()),
                "assigned_to" => filter.assigned_to = Some(value.clone()),
                "status_text" => filter.status_text = Some(value.clone()),
                "open" => filter.open = Some(parse_bool(value)?),
                "created_on" => filter.created_on = Some(parse_timestamp("created_on", value)?),
                "updated_on" => filter.updated_on = Some(parse_timestamp("updated_on", value)?),
                _ => debug!("Ignoring unrecognised query parameter {}", key),
            }
        }

        Ok(filter)
    }

    /**
     * every recognised field in a fixed order
     * None where the query did not mention the field
     */
    fn criteria(&self) -> Result<Vec<(&'static str, Option<Bson>)>, bson::ser::Error> {
        let text = |value: &Option<String>| value.clone().map(Bson::String);
        let timestamp = |value: &Option<DateTime<Utc>>| value.as_ref().map(bson::to_bson).transpose();

        Ok(vec![
            ("_id", self.id.map(Bson::ObjectId)),
            ("issue_title", text(&self.issue_title)),
            ("issue_text", text(&self.issue_text)),
            ("created_by", text(&self.created_by)),
            ("assigned_to", text(&self.assigned_to)),
            ("open", self.open.map(Bson::Boolean)),
            ("status_text", text(&self.status_text)),
            ("created_on", timestamp(&self.created_on)?),
            ("updated_on", timestamp(&self.updated_on)?),
        ])
    }

    /**
     * find() filter for the flat collection
     * None when the query contradicts the project grouping
     */
    pub fn find_document(&self, project: &str) -> Result<Option<Document>, bson::ser::Error> {
        if let Some(title) = &self.issue_title {
            if title != project {
                return Ok(None);
            }
        }

        let mut filter = doc! { "issue_title": project };
        for (field, value) in self.criteria()? {
            if let Some(value) = value {
                filter.insert(field, value);
            }
        }
        Ok(Some(filter))
    }

    /// One `$match` stage per recognised field; absent fields match everything.
    pub fn match_stages(&self) -> Result<Vec<Document>, bson::ser::Error> {
        Ok(self
            .criteria()?
            .into_iter()
            .map(|(field, value)| match value {
                Some(value) => doc! { "$match": { field: value } },
                None => doc! { "$match": {} },
            })
            .collect())
    }

    pub fn matches(&self, issue: &Issue) -> bool {
        fn eq<T: PartialEq>(wanted: &Option<T>, actual: &T) -> bool {
            wanted.as_ref().is_none_or(|wanted| wanted == actual)
        }

        eq(&self.id, &issue.id)
            && eq(&self.issue_title, &issue.issue_title)
            && eq(&self.issue_text, &issue.issue_text)
            && eq(&self.created_by, &issue.created_by)
            && eq(&self.assigned_to, &issue.assigned_to)
            && eq(&self.open, &issue.open)
            && eq(&self.status_text, &issue.status_text)
            && eq(&self.created_on, &issue.created_on)
            && eq(&self.updated_on, &issue.updated_on)
    }
}

fn parse_bool(value: &str) -> Result<bool, FilterError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(FilterError::InvalidValue {
            field: "open",
            value: value.to_string(),
        }),
    }
}

fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>, FilterError> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| FilterError::InvalidValue {
            field,
            value: value.to_string(),
        })
}
