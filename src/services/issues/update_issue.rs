use crate::error::ApiError;
use crate::services::db::store::StorageVariant;
use crate::services::issues::changes::IssueChanges;
use crate::services::issues::models::{Confirmation, Rejection, UpdateIssueRequest};
use crate::AppState;
use axum::{
    extract::{Json, Path, State},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use tracing::{debug, error, info};

/**
 * api endpoint to update an issue
 * unknown and malformed ids both answer "could not update"
 * a request without a JSON body is treated as one without an _id
 */
pub async fn update_issue(
    Path(project): Path<String>,
    State(state): State<AppState>,
    payload: Option<Json<UpdateIssueRequest>>,
) -> Result<Response, ApiError> {
    let payload = payload.map(|Json(body)| body).unwrap_or_default();
    let Some(raw_id) = payload.id.clone().filter(|id| !id.is_empty()) else {
        return Ok(Rejection::MissingId.into_response());
    };

    let changes = match IssueChanges::from_request(&payload) {
        Ok(changes) => changes,
        Err(err) => {
            debug!("Rejecting update of {}: {}", raw_id, err);
            return Ok(Rejection::CouldNotUpdate(raw_id).into_response());
        }
    };

    // the flat layout lets an empty update through and only refreshes updated_on
    if changes.is_blank() && state.store.variant() == StorageVariant::Embedded {
        return Ok(Rejection::NoUpdateFields(raw_id).into_response());
    }

    let Ok(id) = ObjectId::parse_str(&raw_id) else {
        debug!("Malformed _id {:?} on update", raw_id);
        return Ok(Rejection::CouldNotUpdate(raw_id).into_response());
    };

    let updated = state
        .store
        .update_one(&project, id, &changes, Utc::now())
        .await
        .map_err(|err| {
            error!("Failed to update issue {}: {}", raw_id, err);
            ApiError::from(err)
        })?;

    if !updated {
        return Ok(Rejection::CouldNotUpdate(raw_id).into_response());
    }

    info!("Issue {} has been updated", raw_id);
    Ok(Confirmation::Updated(raw_id).into_response())
}
