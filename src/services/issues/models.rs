use crate::models::issue::Issue;
use axum::{
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

#[derive(Deserialize, Debug, Default)]
pub struct CreateIssueRequest {
    #[serde(default)]
    pub issue_title: Option<String>,
    #[serde(default)]
    pub issue_text: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub status_text: Option<String>,
}

/**
 * PUT body
 * absent and null both deserialize to None
 * open is kept raw until the id is known, so a bad value can be answered per issue
 */
#[derive(Deserialize, Debug, Default)]
pub struct UpdateIssueRequest {
    #[serde(rename = "_id", default, deserialize_with = "loose_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub issue_title: Option<String>,
    #[serde(default)]
    pub issue_text: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub status_text: Option<String>,
    #[serde(default)]
    pub open: Option<Value>,
}

#[derive(Deserialize, Debug, Default)]
pub struct DeleteIssueRequest {
    #[serde(rename = "_id", default, deserialize_with = "loose_id")]
    pub id: Option<String>,
}

// any JSON value is an identifier candidate, ObjectId parsing decides later
fn loose_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
    })
}

/// Issue as it goes over the wire, identifier rendered as hex.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IssueView {
    #[serde(rename = "_id")]
    pub id: String,
    pub issue_title: String,
    pub issue_text: String,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
    pub created_by: String,
    pub assigned_to: String,
    pub open: bool,
    pub status_text: String,
}

impl From<Issue> for IssueView {
    fn from(issue: Issue) -> Self {
        IssueView {
            id: issue.id.to_hex(),
            issue_title: issue.issue_title,
            issue_text: issue.issue_text,
            created_on: issue.created_on,
            updated_on: issue.updated_on,
            created_by: issue.created_by,
            assigned_to: issue.assigned_to,
            open: issue.open,
            status_text: issue.status_text,
        }
    }
}

/// Expected refusals; answered with 200 and an `error` body.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    MissingFields,
    MissingId,
    NoUpdateFields(String),
    CouldNotUpdate(String),
    CouldNotDelete(String),
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        let body = match self {
            Rejection::MissingFields => json!({ "error": "required field(s) missing" }),
            Rejection::MissingId => json!({ "error": "missing _id" }),
            Rejection::NoUpdateFields(id) => json!({ "error": "no update field(s) sent", "_id": id }),
            Rejection::CouldNotUpdate(id) => json!({ "error": "could not update", "_id": id }),
            Rejection::CouldNotDelete(id) => json!({ "error": "could not delete", "_id": id }),
        };
        Json(body).into_response()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Confirmation {
    Updated(String),
    Deleted(String),
}

impl IntoResponse for Confirmation {
    fn into_response(self) -> Response {
        let body = match self {
            Confirmation::Updated(id) => json!({ "result": "successfully updated", "_id": id }),
            Confirmation::Deleted(id) => json!({ "result": "successfully deleted", "_id": id }),
        };
        Json(body).into_response()
    }
}
