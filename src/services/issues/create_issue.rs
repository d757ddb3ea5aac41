use crate::error::ApiError;
use crate::models::issue::Issue;
use crate::services::db::store::CreateOutcome;
use crate::services::issues::models::{CreateIssueRequest, IssueView, Rejection};
use crate::AppState;
use axum::{
    extract::{Json, Path, State},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use tracing::{error, info};

/**
 * api endpoint to create an issue
 * nothing is stored unless issue_title, issue_text and created_by are all non-empty
 */
pub async fn create_issue(
    Path(project): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<CreateIssueRequest>,
) -> Result<Response, ApiError> {
    let Some(issue) = new_issue(payload, Utc::now()) else {
        return Ok(Rejection::MissingFields.into_response());
    };

    let outcome = state.store.insert(&project, issue).await.map_err(|err| {
        error!("Failed to save issue for {}: {}", project, err);
        ApiError::from(err)
    })?;

    if let CreateOutcome::CreatedProject(_) = &outcome {
        info!("Created project {} for its first issue", project);
    }
    info!("Issue {} has been saved", outcome.issue().id);

    Ok(Json(IssueView::from(outcome.into_issue())).into_response())
}

fn new_issue(payload: CreateIssueRequest, now: DateTime<Utc>) -> Option<Issue> {
    let required = |value: Option<String>| value.filter(|text| !text.is_empty());

    let issue_title = required(payload.issue_title)?;
    let issue_text = required(payload.issue_text)?;
    let created_by = required(payload.created_by)?;

    Some(Issue::new(
        issue_title,
        issue_text,
        created_by,
        payload.assigned_to.unwrap_or_default(),
        payload.status_text.unwrap_or_default(),
        now,
    ))
}
