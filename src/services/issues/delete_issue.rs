use crate::error::ApiError;
use crate::services::issues::models::{Confirmation, DeleteIssueRequest, Rejection};
use crate::AppState;
use axum::{
    extract::{Json, Path, State},
    response::{IntoResponse, Response},
};
use mongodb::bson::oid::ObjectId;
use tracing::{debug, error, info};

/**
 * api endpoint to delete an issue
 * a request without a JSON body is treated as one without an _id
 */
pub async fn delete_issue(
    Path(project): Path<String>,
    State(state): State<AppState>,
    payload: Option<Json<DeleteIssueRequest>>,
) -> Result<Response, ApiError> {
    let payload = payload.map(|Json(body)| body).unwrap_or_default();
    let Some(raw_id) = payload.id.filter(|id| !id.is_empty()) else {
        return Ok(Rejection::MissingId.into_response());
    };

    let Ok(id) = ObjectId::parse_str(&raw_id) else {
        debug!("Malformed _id {:?} on delete", raw_id);
        return Ok(Rejection::CouldNotDelete(raw_id).into_response());
    };

    let deleted = state.store.delete_one(&project, id).await.map_err(|err| {
        error!("Failed to delete issue {}: {}", raw_id, err);
        ApiError::from(err)
    })?;

    if !deleted {
        return Ok(Rejection::CouldNotDelete(raw_id).into_response());
    }

    info!("Issue {} has been deleted", raw_id);
    Ok(Confirmation::Deleted(raw_id).into_response())
}
