use crate::error::ApiError;
use crate::services::issues::{models::IssueView, query_filter::IssueFilter};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::collections::HashMap;
use tracing::{debug, error};

/**
 * api endpoint to list a project's issues
 * every recognised query parameter narrows the result
 */
pub async fn list_issues(
    Path(project): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    State(state): State<AppState>,
) -> Result<Json<Vec<IssueView>>, ApiError> {
    let filter = match IssueFilter::from_query(&params) {
        Ok(filter) => filter,
        Err(err) => {
            // a value that can't be stored can't match anything either
            debug!("Query for {} matches nothing: {}", project, err);
            return Ok(Json(vec![]));
        }
    };

    let issues = state.store.find(&project, &filter).await.map_err(|err| {
        error!("Failed to list issues for {}: {}", project, err);
        ApiError::from(err)
    })?;

    Ok(Json(issues.into_iter().map(IssueView::from).collect()))
}
