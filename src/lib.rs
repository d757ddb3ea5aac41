use std::sync::Arc;

use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router,
};
use serde_json::json;
use services::db::store::IssueStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

pub mod config;
pub mod error;
pub mod models;
pub mod services;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn IssueStore>, //Arc so every request shares one store
}

impl AppState {
    pub fn new(store: Arc<dyn IssueStore>) -> Self {
        AppState { store }
    }
}

/**
 * reports whether the store answers a ping
 */
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok" }))),
        Err(err) => {
            error!("Storage health check failed: {}", err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
        }
    }
}

pub fn app(state: AppState) -> Router {
    //setting cors
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .merge(services::issues::router())
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
