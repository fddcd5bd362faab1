use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::families::dtos::FamilyResponseDto;
use crate::features::sync::dtos::SyncStatusDto;
use crate::features::sync::services::SyncService;
use crate::shared::types::{AffectedCountDto, ApiResponse, Meta};

/// Families the caller created that are not yet synchronized
#[utoipa::path(
    get,
    path = "/api/sync/pending",
    responses(
        (status = 200, description = "Pending families, oldest first", body = ApiResponse<Vec<FamilyResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "sync",
    security(("bearer_auth" = []))
)]
pub async fn get_pending(
    State(service): State<Arc<SyncService>>,
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<Vec<FamilyResponseDto>>>> {
    let families = service.get_pending(user.user_id).await?;
    let total = families.len() as i64;

    Ok(Json(ApiResponse::success(
        Some(families),
        None,
        Some(Meta { total }),
    )))
}

#[utoipa::path(
    get,
    path = "/api/sync/status",
    responses(
        (status = 200, description = "Pending count and summaries", body = ApiResponse<SyncStatusDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "sync",
    security(("bearer_auth" = []))
)]
pub async fn get_status(
    State(service): State<Arc<SyncService>>,
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<SyncStatusDto>>> {
    let status = service.status(user.user_id).await?;
    Ok(Json(ApiResponse::success(Some(status), None, None)))
}

/// Mark all of the caller's pending families as synchronized
#[utoipa::path(
    post,
    path = "/api/sync/force",
    responses(
        (status = 200, description = "Number of families marked synced", body = ApiResponse<AffectedCountDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "sync",
    security(("bearer_auth" = []))
)]
pub async fn force_sync(
    State(service): State<Arc<SyncService>>,
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<AffectedCountDto>>> {
    let count = service.force_sync(user.user_id).await?;
    Ok(Json(ApiResponse::success(
        Some(AffectedCountDto { count }),
        Some(format!("{} families synchronized", count)),
        None,
    )))
}
