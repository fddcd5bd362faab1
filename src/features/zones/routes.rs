use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::zones::handlers;
use crate::features::zones::services::ZoneService;

pub fn routes(service: Arc<ZoneService>) -> Router {
    Router::new()
        .route(
            "/api/zones",
            post(handlers::assign_zone).get(handlers::list_zones),
        )
        .route("/api/zones/{id}", put(handlers::update_zone))
        .route("/api/zones/import", post(handlers::import_zones_file))
        .route("/api/zones/import/rows", post(handlers::import_zone_rows))
        .route("/api/zones/users/search", get(handlers::search_users))
        .with_state(service)
}
