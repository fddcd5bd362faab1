use crate::features::auth::model::{AuthenticatedUser, Role};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(length(min = 1, max = 150, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponseDto {
    pub access_token: String,
    pub token_type: String,
    /// Seconds until the token expires
    pub expires_in: u64,
    pub user: AuthUserDto,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthUserDto {
    pub id: i64,
    pub username: String,
    pub role: Role,
    pub province_id: Option<i64>,
}

impl From<AuthenticatedUser> for AuthUserDto {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            id: user.user_id,
            username: user.username,
            role: user.role,
            province_id: user.province_id,
        }
    }
}
