use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::families::dtos::{CreateMemberDto, MemberResponseDto, UpdateMemberDto};
use crate::features::families::services::FamilyService;
use crate::shared::types::ApiResponse;

/// List the members of a family
#[utoipa::path(
    get,
    path = "/api/families/{id}/members",
    params(("id" = i64, Path, description = "Family ID")),
    responses(
        (status = 200, description = "Members in insertion order", body = ApiResponse<Vec<MemberResponseDto>>),
        (status = 404, description = "Family not found")
    ),
    tag = "families",
    security(("bearer_auth" = []))
)]
pub async fn list_members(
    State(service): State<Arc<FamilyService>>,
    _user: AuthenticatedUser,
    Path(family_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<MemberResponseDto>>>> {
    let members = service.list_members(family_id).await?;
    Ok(Json(ApiResponse::success(Some(members), None, None)))
}

/// Add a member to a family
#[utoipa::path(
    post,
    path = "/api/families/{id}/members",
    params(("id" = i64, Path, description = "Family ID")),
    request_body = CreateMemberDto,
    responses(
        (status = 201, description = "Member added", body = ApiResponse<MemberResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Family not found")
    ),
    tag = "families",
    security(("bearer_auth" = []))
)]
pub async fn add_member(
    State(service): State<Arc<FamilyService>>,
    _user: AuthenticatedUser,
    Path(family_id): Path<i64>,
    AppJson(dto): AppJson<CreateMemberDto>,
) -> Result<(StatusCode, Json<ApiResponse<MemberResponseDto>>)> {
    dto.validate()?;

    let member = service.add_member(family_id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(member), None, None)),
    ))
}

/// Update a member (only the provided fields change)
#[utoipa::path(
    patch,
    path = "/api/families/{id}/members/{member_id}",
    params(
        ("id" = i64, Path, description = "Family ID"),
        ("member_id" = i64, Path, description = "Member ID")
    ),
    request_body = UpdateMemberDto,
    responses(
        (status = 200, description = "Member updated", body = ApiResponse<MemberResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Member not found in this family")
    ),
    tag = "families",
    security(("bearer_auth" = []))
)]
pub async fn update_member(
    State(service): State<Arc<FamilyService>>,
    _user: AuthenticatedUser,
    Path((family_id, member_id)): Path<(i64, i64)>,
    AppJson(dto): AppJson<UpdateMemberDto>,
) -> Result<Json<ApiResponse<MemberResponseDto>>> {
    dto.validate()?;

    let member = service.update_member(family_id, member_id, dto).await?;
    Ok(Json(ApiResponse::success(Some(member), None, None)))
}

/// Remove a member from a family
#[utoipa::path(
    delete,
    path = "/api/families/{id}/members/{member_id}",
    params(
        ("id" = i64, Path, description = "Family ID"),
        ("member_id" = i64, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Member deleted"),
        (status = 404, description = "Member not found in this family")
    ),
    tag = "families",
    security(("bearer_auth" = []))
)]
pub async fn delete_member(
    State(service): State<Arc<FamilyService>>,
    _user: AuthenticatedUser,
    Path((family_id, member_id)): Path<(i64, i64)>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete_member(family_id, member_id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Member deleted".to_string()),
        None,
    )))
}
