#![allow(dead_code)]

//! Shared helpers for the router tests

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use issue_tracker::error::StoreError;
use issue_tracker::models::issue::Issue;
use issue_tracker::services::db::memory_store::InMemoryIssueStore;
use issue_tracker::services::db::store::{CreateOutcome, IssueStore, StorageVariant};
use issue_tracker::services::issues::{changes::IssueChanges, query_filter::IssueFilter};
use issue_tracker::{app, AppState};
use mongodb::bson::{oid::ObjectId, Document};
use serde_json::{json, Value};
use tower::ServiceExt;

/// Router backed by a fresh in-memory store using the given layout.
pub fn test_app(variant: StorageVariant) -> Router {
    app(AppState::new(Arc::new(InMemoryIssueStore::new(variant))))
}

pub fn failing_app() -> Router {
    app(AppState::new(Arc::new(FailingStore)))
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

pub async fn create(app: &Router, project: &str, body: Value) -> Value {
    let uri = format!("/api/issues/{project}");
    let (status, json) = send_json(app, "POST", &uri, Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    json
}

pub async fn list(app: &Router, uri: &str) -> Vec<Value> {
    let (status, json) = send_json(app, "GET", uri, None).await;
    assert_eq!(status, StatusCode::OK);
    json.as_array().unwrap().clone()
}

pub fn full_issue(title: &str) -> Value {
    json!({
        "issue_title": title,
        "issue_text": "Functional test - every field",
        "created_by": "test user",
        "assigned_to": "test user",
        "status_text": "IN QA",
    })
}

pub fn required_issue(title: &str) -> Value {
    json!({
        "issue_title": title,
        "issue_text": "Functional test - required fields",
        "created_by": "test user",
    })
}

/// Store whose every call fails, for the error path.
pub struct FailingStore;

fn broken() -> StoreError {
    StoreError::Decode(mongodb::bson::from_document::<Issue>(Document::new()).unwrap_err())
}

#[async_trait]
impl IssueStore for FailingStore {
    fn variant(&self) -> StorageVariant {
        StorageVariant::Embedded
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(broken())
    }

    async fn find(&self, _project: &str, _filter: &IssueFilter) -> Result<Vec<Issue>, StoreError> {
        Err(broken())
    }

    async fn insert(&self, _project: &str, _issue: Issue) -> Result<CreateOutcome, StoreError> {
        Err(broken())
    }

    async fn update_one(
        &self,
        _project: &str,
        _id: ObjectId,
        _changes: &IssueChanges,
        _now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        Err(broken())
    }

    async fn delete_one(&self, _project: &str, _id: ObjectId) -> Result<bool, StoreError> {
        Err(broken())
    }
}
