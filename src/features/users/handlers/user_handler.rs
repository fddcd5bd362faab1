use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireSuperTier;
use crate::features::users::dtos::{CreateUserDto, ProvinceResponseDto, UserResponseDto};
use crate::features::users::services::UserService;
use crate::shared::types::{ApiResponse, Meta};

/// Create a user account
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Outside the caller's province or role"),
        (status = 409, description = "Username already taken")
    ),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn create_user(
    State(service): State<Arc<UserService>>,
    RequireSuperTier(user): RequireSuperTier,
    AppJson(dto): AppJson<CreateUserDto>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponseDto>>)> {
    dto.validate()?;

    let created = service.create_user(&user, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(created),
            Some("User created".to_string()),
            None,
        )),
    ))
}

/// List user accounts visible to the caller
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "List of users", body = ApiResponse<Vec<UserResponseDto>>),
        (status = 403, description = "Supervisor access required")
    ),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    State(service): State<Arc<UserService>>,
    RequireSuperTier(user): RequireSuperTier,
) -> Result<Json<ApiResponse<Vec<UserResponseDto>>>> {
    let users = service.list_users(&user).await?;
    let total = users.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(users),
        None,
        Some(Meta { total }),
    )))
}

/// Get a user account by id
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = ApiResponse<UserResponseDto>),
        (status = 403, description = "User belongs to another province"),
        (status = 404, description = "User not found")
    ),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    State(service): State<Arc<UserService>>,
    RequireSuperTier(user): RequireSuperTier,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<UserResponseDto>>> {
    let found = service.get_user(&user, id).await?;
    Ok(Json(ApiResponse::success(Some(found), None, None)))
}

/// Delete a user account
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 403, description = "Not allowed to delete this user"),
        (status = 404, description = "User not found")
    ),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    State(service): State<Arc<UserService>>,
    RequireSuperTier(user): RequireSuperTier,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete_user(&user, id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("User deleted".to_string()),
        None,
    )))
}

/// List provinces
#[utoipa::path(
    get,
    path = "/api/provinces",
    responses(
        (status = 200, description = "List of provinces", body = ApiResponse<Vec<ProvinceResponseDto>>),
    ),
    tag = "users"
)]
pub async fn list_provinces(
    State(service): State<Arc<UserService>>,
) -> Result<Json<ApiResponse<Vec<ProvinceResponseDto>>>> {
    let provinces = service.list_provinces().await?;
    Ok(Json(ApiResponse::success(Some(provinces), None, None)))
}
