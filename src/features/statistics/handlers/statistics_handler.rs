use std::sync::Arc;

use axum::{extract::State, Json};
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::AppQuery;
use crate::features::auth::guards::RequireSuperTier;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::statistics::dtos::{
    AgentActivityDto, OverviewDto, OverviewQuery, PageStatsDto, PageStatsQuery,
};
use crate::features::statistics::services::StatisticsService;
use crate::shared::types::ApiResponse;

/// Member rollups by gender, province, role, city and birth year
#[utoipa::path(
    get,
    path = "/api/stats",
    params(PageStatsQuery),
    responses(
        (status = 200, description = "Registry rollups", body = ApiResponse<PageStatsDto>),
        (status = 400, description = "Year filter out of range"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "statistics",
    security(("bearer_auth" = []))
)]
pub async fn page_stats(
    State(service): State<Arc<StatisticsService>>,
    _user: AuthenticatedUser,
    AppQuery(query): AppQuery<PageStatsQuery>,
) -> Result<Json<ApiResponse<PageStatsDto>>> {
    query.validate()?;

    let stats = service.page_stats(&query).await?;
    Ok(Json(ApiResponse::success(Some(stats), None, None)))
}

/// Dashboard totals
#[utoipa::path(
    get,
    path = "/api/stats/overview",
    params(OverviewQuery),
    responses(
        (status = 200, description = "Totals", body = ApiResponse<OverviewDto>),
        (status = 403, description = "Supervisor access required")
    ),
    tag = "statistics",
    security(("bearer_auth" = []))
)]
pub async fn overview(
    State(service): State<Arc<StatisticsService>>,
    RequireSuperTier(_user): RequireSuperTier,
    AppQuery(query): AppQuery<OverviewQuery>,
) -> Result<Json<ApiResponse<OverviewDto>>> {
    let overview = service.overview(query.city.as_deref()).await?;
    Ok(Json(ApiResponse::success(Some(overview), None, None)))
}

#[utoipa::path(
    get,
    path = "/api/stats/agents",
    responses(
        (status = 200, description = "Families registered per account", body = ApiResponse<Vec<AgentActivityDto>>),
        (status = 403, description = "Supervisor access required")
    ),
    tag = "statistics",
    security(("bearer_auth" = []))
)]
pub async fn agent_activity(
    State(service): State<Arc<StatisticsService>>,
    RequireSuperTier(_user): RequireSuperTier,
) -> Result<Json<ApiResponse<Vec<AgentActivityDto>>>> {
    let activity = service.agent_activity().await?;
    Ok(Json(ApiResponse::success(Some(activity), None, None)))
}
