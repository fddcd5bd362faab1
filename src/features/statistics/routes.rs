use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::statistics::handlers;
use crate::features::statistics::services::StatisticsService;

pub fn routes(service: Arc<StatisticsService>) -> Router {
    Router::new()
        .route("/api/stats", get(handlers::page_stats))
        .route("/api/stats/overview", get(handlers::overview))
        .route("/api/stats/agents", get(handlers::agent_activity))
        .with_state(service)
}
