use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::auth::guards::RequireSuperTier;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::zones::dtos::{
    AssignZoneDto, ImportZoneRowsDto, ImportZonesFileDto, UpdateZoneDto, UserSearchQuery,
    ZoneImportResultDto, ZoneListQuery, ZoneOwnerDto, ZoneResponseDto,
};
use crate::features::zones::handlers::import::read_import_file;
use crate::features::zones::services::ZoneService;
use crate::shared::types::{ApiResponse, Meta};

/// Assign a zone to a user
#[utoipa::path(
    post,
    path = "/api/zones",
    request_body = AssignZoneDto,
    responses(
        (status = 201, description = "Zone created", body = ApiResponse<ZoneResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Supervisor access required"),
        (status = 404, description = "User not found")
    ),
    tag = "zones",
    security(("bearer_auth" = []))
)]
pub async fn assign_zone(
    State(service): State<Arc<ZoneService>>,
    RequireSuperTier(_user): RequireSuperTier,
    AppJson(dto): AppJson<AssignZoneDto>,
) -> Result<(StatusCode, Json<ApiResponse<ZoneResponseDto>>)> {
    dto.validate()?;

    let zone = service.assign_zone(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(zone),
            Some("Zone assigned".to_string()),
            None,
        )),
    ))
}

/// List zones, optionally filtered by owner
#[utoipa::path(
    get,
    path = "/api/zones",
    params(ZoneListQuery),
    responses(
        (status = 200, description = "Zones with their owner", body = ApiResponse<Vec<ZoneResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "zones",
    security(("bearer_auth" = []))
)]
pub async fn list_zones(
    State(service): State<Arc<ZoneService>>,
    _user: AuthenticatedUser,
    AppQuery(query): AppQuery<ZoneListQuery>,
) -> Result<Json<ApiResponse<Vec<ZoneResponseDto>>>> {
    let zones = service.list_zones(query.user_id).await?;
    let total = zones.len() as i64;

    Ok(Json(ApiResponse::success(
        Some(zones),
        None,
        Some(Meta { total }),
    )))
}

/// Replace a zone's geometry
#[utoipa::path(
    put,
    path = "/api/zones/{id}",
    params(("id" = i64, Path, description = "Zone ID")),
    request_body = UpdateZoneDto,
    responses(
        (status = 200, description = "Zone updated", body = ApiResponse<ZoneResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Supervisor access required"),
        (status = 404, description = "Zone not found")
    ),
    tag = "zones",
    security(("bearer_auth" = []))
)]
pub async fn update_zone(
    State(service): State<Arc<ZoneService>>,
    RequireSuperTier(_user): RequireSuperTier,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<UpdateZoneDto>,
) -> Result<Json<ApiResponse<ZoneResponseDto>>> {
    dto.validate()?;

    let zone = service.update_zone(id, dto.geometry).await?;
    Ok(Json(ApiResponse::success(
        Some(zone),
        Some("Zone updated".to_string()),
        None,
    )))
}

/// Import zones from a CSV or XLSX upload (`file` part)
///
/// Columns: `user_id` (or `utilisateur_id`) and `geometry` (or `geojson`,
/// `geometrie`). Malformed rows are skipped.
#[utoipa::path(
    post,
    path = "/api/zones/import",
    request_body(
        content = ImportZonesFileDto,
        content_type = "multipart/form-data",
        description = "Spreadsheet in the `file` part",
    ),
    responses(
        (status = 200, description = "Import summary", body = ApiResponse<ZoneImportResultDto>),
        (status = 400, description = "Missing or unreadable file"),
        (status = 403, description = "Supervisor access required")
    ),
    tag = "zones",
    security(("bearer_auth" = []))
)]
pub async fn import_zones_file(
    State(service): State<Arc<ZoneService>>,
    RequireSuperTier(_user): RequireSuperTier,
    multipart: Multipart,
) -> Result<Json<ApiResponse<ZoneImportResultDto>>> {
    let rows = read_import_file(multipart).await?;
    let result = service.bulk_import_zones(&rows).await?;

    Ok(Json(ApiResponse::success(
        Some(result.clone()),
        Some(format!("{} zones imported", result.imported)),
        None,
    )))
}

/// Import zones from rows already parsed by the caller
#[utoipa::path(
    post,
    path = "/api/zones/import/rows",
    request_body = ImportZoneRowsDto,
    responses(
        (status = 200, description = "Import summary", body = ApiResponse<ZoneImportResultDto>),
        (status = 403, description = "Supervisor access required")
    ),
    tag = "zones",
    security(("bearer_auth" = []))
)]
pub async fn import_zone_rows(
    State(service): State<Arc<ZoneService>>,
    RequireSuperTier(_user): RequireSuperTier,
    AppJson(dto): AppJson<ImportZoneRowsDto>,
) -> Result<Json<ApiResponse<ZoneImportResultDto>>> {
    let result = service.bulk_import_zones(&dto.rows).await?;

    Ok(Json(ApiResponse::success(
        Some(result.clone()),
        Some(format!("{} zones imported", result.imported)),
        None,
    )))
}

/// Search users by username for zone assignment
#[utoipa::path(
    get,
    path = "/api/zones/users/search",
    params(UserSearchQuery),
    responses(
        (status = 200, description = "Matching users", body = ApiResponse<Vec<ZoneOwnerDto>>),
        (status = 403, description = "Supervisor access required")
    ),
    tag = "zones",
    security(("bearer_auth" = []))
)]
pub async fn search_users(
    State(service): State<Arc<ZoneService>>,
    RequireSuperTier(_user): RequireSuperTier,
    AppQuery(query): AppQuery<UserSearchQuery>,
) -> Result<Json<ApiResponse<Vec<ZoneOwnerDto>>>> {
    let users = service.search_users(&query.q).await?;
    Ok(Json(ApiResponse::success(Some(users), None, None)))
}
