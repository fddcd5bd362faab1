use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::features::auth::model::Role;

/// Database model for a user account
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub province_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// User row joined with its province name, for listings
#[derive(Debug, Clone, FromRow)]
pub struct UserWithProvince {
    pub id: i64,
    pub username: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub province_id: Option<i64>,
    pub province_name: Option<String>,
    pub created_at: DateTime<Utc>,
}
