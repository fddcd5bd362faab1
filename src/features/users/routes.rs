use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::users::handlers;
use crate::features::users::services::UserService;

/// Province reference data (no authentication required)
pub fn public_routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route("/api/provinces", get(handlers::list_provinces))
        .with_state(service)
}

/// User management routes (supervisor tier, province scoped)
pub fn routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route(
            "/api/users",
            post(handlers::create_user).get(handlers::list_users),
        )
        .route(
            "/api/users/{id}",
            get(handlers::get_user).delete(handlers::delete_user),
        )
        .with_state(service)
}
