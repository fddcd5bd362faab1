use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::features::families::handlers;
use crate::features::families::services::FamilyService;

/// Public intake (no authentication; records are stored unvalidated)
pub fn public_routes(service: Arc<FamilyService>) -> Router {
    Router::new()
        .route("/api/public/families", post(handlers::submit_public_family))
        .with_state(service)
}

/// Agent routes (require bearer token)
pub fn routes(service: Arc<FamilyService>) -> Router {
    Router::new()
        .route(
            "/api/families",
            post(handlers::create_family).get(handlers::list_families),
        )
        .route("/api/families/offline", post(handlers::create_family_offline))
        .route(
            "/api/families/{id}",
            get(handlers::get_family)
                .patch(handlers::update_family)
                .delete(handlers::delete_family),
        )
        .route("/api/families/{id}/location", patch(handlers::update_location))
        .route("/api/families/{id}/duration", patch(handlers::update_duration))
        .route(
            "/api/families/{id}/members",
            get(handlers::list_members).post(handlers::add_member),
        )
        .route(
            "/api/families/{id}/members/{member_id}",
            patch(handlers::update_member).delete(handlers::delete_member),
        )
        .with_state(service)
}
