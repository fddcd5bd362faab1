use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::auth::model::Role;
use crate::features::users::models::{Province, UserWithProvince};
use crate::shared::validation::USERNAME_REGEX;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(
        length(min = 3, max = 150, message = "Username must be between 3 and 150 characters"),
        regex(path = *USERNAME_REGEX, message = "Username may only contain letters, digits, dots and underscores")
    )]
    pub username: String,

    #[validate(length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"))]
    pub password: String,

    pub role: Role,

    /// Defaults to the creator's province for supervisors
    pub province_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponseDto {
    pub id: i64,
    pub username: String,
    pub role: Role,
    pub province_id: Option<i64>,
    pub province_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<UserWithProvince> for UserResponseDto {
    fn from(u: UserWithProvince) -> Self {
        Self {
            id: u.id,
            username: u.username,
            role: u.role,
            province_id: u.province_id,
            province_name: u.province_name,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProvinceResponseDto {
    pub id: i64,
    pub name: String,
}

impl From<Province> for ProvinceResponseDto {
    fn from(p: Province) -> Self {
        Self {
            id: p.id,
            name: p.name,
        }
    }
}
