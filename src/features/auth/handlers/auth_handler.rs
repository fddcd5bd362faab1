use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::dtos::{AuthUserDto, LoginRequestDto, LoginResponseDto};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::AuthService;
use crate::shared::types::ApiResponse;
use axum::{extract::State, Json};
use std::sync::Arc;
use validator::Validate;

/// Login with username and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<LoginRequestDto>,
) -> Result<Json<ApiResponse<LoginResponseDto>>> {
    dto.validate()?;

    let response = service.login(dto).await?;
    Ok(Json(ApiResponse::success(Some(response), None, None)))
}

/// Get current authenticated user info
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user retrieved successfully", body = ApiResponse<AuthUserDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(user: AuthenticatedUser) -> Result<Json<ApiResponse<AuthUserDto>>> {
    Ok(Json(ApiResponse::success(
        Some(AuthUserDto::from(user)),
        None,
        None,
    )))
}
