use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireSuperTier;
use crate::features::duplicates::dtos::{DuplicateGroupDto, ResolveGroupDto, ResolveOutcomeDto};
use crate::features::duplicates::services::DuplicateService;
use crate::shared::types::{AffectedCountDto, ApiResponse, Meta};

/// List groups of likely duplicate members
#[utoipa::path(
    get,
    path = "/api/duplicates",
    responses(
        (status = 200, description = "Duplicate groups", body = ApiResponse<Vec<DuplicateGroupDto>>),
        (status = 403, description = "Supervisor access required")
    ),
    tag = "duplicates",
    security(("bearer_auth" = []))
)]
pub async fn list_duplicates(
    State(service): State<Arc<DuplicateService>>,
    RequireSuperTier(_user): RequireSuperTier,
) -> Result<Json<ApiResponse<Vec<DuplicateGroupDto>>>> {
    let groups = service.find_duplicate_groups().await?;
    let total = groups.len() as i64;

    Ok(Json(ApiResponse::success(
        Some(groups),
        None,
        Some(Meta { total }),
    )))
}

/// Keep the earliest member of a group and delete the others
#[utoipa::path(
    post,
    path = "/api/duplicates/resolve",
    request_body = ResolveGroupDto,
    responses(
        (status = 200, description = "Group resolved", body = ApiResponse<ResolveOutcomeDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Supervisor access required")
    ),
    tag = "duplicates",
    security(("bearer_auth" = []))
)]
pub async fn resolve_group(
    State(service): State<Arc<DuplicateService>>,
    RequireSuperTier(_user): RequireSuperTier,
    AppJson(dto): AppJson<ResolveGroupDto>,
) -> Result<Json<ApiResponse<ResolveOutcomeDto>>> {
    dto.validate()?;

    let outcome = service.resolve_group(dto).await?;
    Ok(Json(ApiResponse::success(Some(outcome), None, None)))
}

/// Delete a single duplicate member
#[utoipa::path(
    delete,
    path = "/api/duplicates/members/{member_id}",
    params(("member_id" = i64, Path, description = "Member ID")),
    responses(
        (status = 200, description = "Number of members removed (0 or 1)", body = ApiResponse<AffectedCountDto>),
        (status = 403, description = "Supervisor access required")
    ),
    tag = "duplicates",
    security(("bearer_auth" = []))
)]
pub async fn resolve_single(
    State(service): State<Arc<DuplicateService>>,
    RequireSuperTier(_user): RequireSuperTier,
    Path(member_id): Path<i64>,
) -> Result<Json<ApiResponse<AffectedCountDto>>> {
    let count = service.resolve_single(member_id).await?;
    Ok(Json(ApiResponse::success(
        Some(AffectedCountDto { count }),
        None,
        None,
    )))
}
