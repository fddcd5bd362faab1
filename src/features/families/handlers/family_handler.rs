use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::families::dtos::{
    CreateFamilyDto, FamilyDetailDto, FamilyResponseDto, UpdateDurationDto, UpdateFamilyDto,
    UpdateLocationDto,
};
use crate::features::families::handlers::intake::{offline_photo, read_family_form};
use crate::features::families::models::SubmissionChannel;
use crate::features::families::services::FamilyService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// Register a family (field agent)
///
/// Multipart form with the family name, root person fields, optional
/// `latitude`/`longitude`/`fill_duration` and an optional `photo` file.
#[utoipa::path(
    post,
    path = "/api/families",
    request_body(content = CreateFamilyDto, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Family registered", body = ApiResponse<FamilyDetailDto>),
        (status = 400, description = "Missing or malformed field"),
        (status = 401, description = "Authentication required")
    ),
    tag = "families",
    security(("bearer_auth" = []))
)]
pub async fn create_family(
    State(service): State<Arc<FamilyService>>,
    user: AuthenticatedUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<FamilyDetailDto>>)> {
    let (dto, photo) = read_family_form(multipart).await?;
    dto.validate()?;

    let family = service
        .create_family(dto, photo, Some(user.user_id), SubmissionChannel::Agent)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(family),
            Some("Family registered".to_string()),
            None,
        )),
    ))
}

/// Register a family captured offline (field agent)
///
/// JSON body; the photo, if any, is a base64 data URL.
#[utoipa::path(
    post,
    path = "/api/families/offline",
    request_body = CreateFamilyDto,
    responses(
        (status = 201, description = "Family registered", body = ApiResponse<FamilyDetailDto>),
        (status = 400, description = "Missing or malformed field"),
        (status = 401, description = "Authentication required")
    ),
    tag = "families",
    security(("bearer_auth" = []))
)]
pub async fn create_family_offline(
    State(service): State<Arc<FamilyService>>,
    user: AuthenticatedUser,
    AppJson(mut dto): AppJson<CreateFamilyDto>,
) -> Result<(StatusCode, Json<ApiResponse<FamilyDetailDto>>)> {
    dto.validate()?;
    let photo = offline_photo(&mut dto)?;

    let family = service
        .create_family(dto, photo, Some(user.user_id), SubmissionChannel::Agent)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(family),
            Some("Family registered".to_string()),
            None,
        )),
    ))
}

/// Submit a family from the public form
///
/// No authentication; the record is stored unvalidated.
#[utoipa::path(
    post,
    path = "/api/public/families",
    request_body(content = CreateFamilyDto, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Family submitted for validation", body = ApiResponse<FamilyDetailDto>),
        (status = 400, description = "Missing or malformed field")
    ),
    tag = "families"
)]
pub async fn submit_public_family(
    State(service): State<Arc<FamilyService>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<FamilyDetailDto>>)> {
    let (dto, photo) = read_family_form(multipart).await?;
    dto.validate()?;

    let family = service
        .create_family(dto, photo, None, SubmissionChannel::Public)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(family),
            Some("Family submitted".to_string()),
            None,
        )),
    ))
}

/// List families, newest first
#[utoipa::path(
    get,
    path = "/api/families",
    params(PaginationQuery),
    responses(
        (status = 200, description = "List of families", body = ApiResponse<Vec<FamilyResponseDto>>),
        (status = 401, description = "Authentication required")
    ),
    tag = "families",
    security(("bearer_auth" = []))
)]
pub async fn list_families(
    State(service): State<Arc<FamilyService>>,
    _user: AuthenticatedUser,
    AppQuery(pagination): AppQuery<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<FamilyResponseDto>>>> {
    let (families, total) = service.list_families(&pagination).await?;
    Ok(Json(ApiResponse::success(
        Some(families),
        None,
        Some(Meta { total }),
    )))
}

/// Get a family with its members
#[utoipa::path(
    get,
    path = "/api/families/{id}",
    params(("id" = i64, Path, description = "Family ID")),
    responses(
        (status = 200, description = "Family found", body = ApiResponse<FamilyDetailDto>),
        (status = 404, description = "Family not found")
    ),
    tag = "families",
    security(("bearer_auth" = []))
)]
pub async fn get_family(
    State(service): State<Arc<FamilyService>>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<FamilyDetailDto>>> {
    let family = service.get_family(id).await?;
    Ok(Json(ApiResponse::success(Some(family), None, None)))
}

/// Update a family (only the provided fields change)
#[utoipa::path(
    patch,
    path = "/api/families/{id}",
    params(("id" = i64, Path, description = "Family ID")),
    request_body = UpdateFamilyDto,
    responses(
        (status = 200, description = "Family updated", body = ApiResponse<FamilyResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Family not found")
    ),
    tag = "families",
    security(("bearer_auth" = []))
)]
pub async fn update_family(
    State(service): State<Arc<FamilyService>>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<UpdateFamilyDto>,
) -> Result<Json<ApiResponse<FamilyResponseDto>>> {
    dto.validate()?;

    let family = service.update_family(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(family), None, None)))
}

/// Set a family's GPS location
#[utoipa::path(
    patch,
    path = "/api/families/{id}/location",
    params(("id" = i64, Path, description = "Family ID")),
    request_body = UpdateLocationDto,
    responses(
        (status = 200, description = "Location updated", body = ApiResponse<FamilyResponseDto>),
        (status = 400, description = "Coordinates out of range"),
        (status = 404, description = "Family not found")
    ),
    tag = "families",
    security(("bearer_auth" = []))
)]
pub async fn update_location(
    State(service): State<Arc<FamilyService>>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<UpdateLocationDto>,
) -> Result<Json<ApiResponse<FamilyResponseDto>>> {
    dto.validate()?;

    let family = service.update_location(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(family), None, None)))
}

/// Record how long the intake took
#[utoipa::path(
    patch,
    path = "/api/families/{id}/duration",
    params(("id" = i64, Path, description = "Family ID")),
    request_body = UpdateDurationDto,
    responses(
        (status = 200, description = "Duration updated", body = ApiResponse<FamilyResponseDto>),
        (status = 400, description = "Negative duration"),
        (status = 404, description = "Family not found")
    ),
    tag = "families",
    security(("bearer_auth" = []))
)]
pub async fn update_duration(
    State(service): State<Arc<FamilyService>>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<UpdateDurationDto>,
) -> Result<Json<ApiResponse<FamilyResponseDto>>> {
    dto.validate()?;

    let family = service.update_duration(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(family), None, None)))
}

/// Delete a family and all its members
#[utoipa::path(
    delete,
    path = "/api/families/{id}",
    params(("id" = i64, Path, description = "Family ID")),
    responses(
        (status = 200, description = "Family deleted"),
        (status = 404, description = "Family not found")
    ),
    tag = "families",
    security(("bearer_auth" = []))
)]
pub async fn delete_family(
    State(service): State<Arc<FamilyService>>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete_family(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Family deleted".to_string()),
        None,
    )))
}
