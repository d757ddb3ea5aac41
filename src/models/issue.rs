use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/**
 * a single tracked issue
 * stored on its own in the flat collection or inside a Project
 */
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Issue {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub issue_title: String,
    pub issue_text: String,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
    pub created_by: String,
    #[serde(default)]
    pub assigned_to: String,
    #[serde(default = "default_open")]
    pub open: bool,
    #[serde(default)]
    pub status_text: String,
}

fn default_open() -> bool {
    true
}

impl Issue {
    /// Both timestamps are stamped with the same instant.
    pub fn new(
        issue_title: String,
        issue_text: String,
        created_by: String,
        assigned_to: String,
        status_text: String,
        now: DateTime<Utc>,
    ) -> Self {
        Issue {
            id: ObjectId::new(),
            issue_title,
            issue_text,
            created_on: now,
            updated_on: now,
            created_by,
            assigned_to,
            open: true,
            status_text,
        }
    }
}
