use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::sync::handlers;
use crate::features::sync::services::SyncService;

pub fn routes(service: Arc<SyncService>) -> Router {
    Router::new()
        .route("/api/sync/pending", get(handlers::get_pending))
        .route("/api/sync/status", get(handlers::get_status))
        .route("/api/sync/force", post(handlers::force_sync))
        .with_state(service)
}
