use crate::models::issue::Issue;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/**
 * owning document of the embedded layout
 * issues keep insertion order
 */
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    #[serde(default)]
    pub issues: Vec<Issue>,
}

impl Project {
    pub fn new(name: &str) -> Self {
        Project {
            id: ObjectId::new(),
            name: name.to_string(),
            issues: vec![],
        }
    }
}
