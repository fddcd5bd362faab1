use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::features::duplicates::handlers;
use crate::features::duplicates::services::DuplicateService;

pub fn routes(service: Arc<DuplicateService>) -> Router {
    Router::new()
        .route("/api/duplicates", get(handlers::list_duplicates))
        .route("/api/duplicates/resolve", post(handlers::resolve_group))
        .route(
            "/api/duplicates/members/{member_id}",
            delete(handlers::resolve_single),
        )
        .with_state(service)
}
