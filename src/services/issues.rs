use crate::AppState;
use axum::{routing::get, Router};

pub mod changes;
pub mod create_issue;
pub mod delete_issue;
pub mod list_issues;
pub mod models;
pub mod query_filter;
pub mod update_issue;

/**
 * issue routes, all under one project-scoped path
 */
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/issues/{project}",
        get(list_issues::list_issues)
            .post(create_issue::create_issue)
            .put(update_issue::update_issue)
            .delete(delete_issue::delete_issue),
    )
}
