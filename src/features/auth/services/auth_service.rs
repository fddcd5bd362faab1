use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{AuthUserDto, LoginRequestDto, LoginResponseDto};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::{credential_service, TokenService};
use crate::features::users::models::User;
use sqlx::PgPool;
use std::sync::Arc;

/// Username/password login backed by the users table
pub struct AuthService {
    pool: PgPool,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(pool: PgPool, tokens: Arc<TokenService>) -> Self {
        Self { pool, tokens }
    }

    pub async fn login(&self, dto: LoginRequestDto) -> Result<LoginResponseDto> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, role, province_id, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(dto.username.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up user for login: {:?}", e);
            AppError::Database(e)
        })?;

        // Same message for unknown user and wrong password
        let invalid = || AppError::Unauthorized("Invalid username or password".to_string());

        let user = user.ok_or_else(invalid)?;

        let verified =
            credential_service::verify_password_blocking(dto.password, user.password_hash.clone())
                .await?;
        if !verified {
            tracing::info!("Failed login attempt for user {}", user.username);
            return Err(invalid());
        }

        let identity = AuthenticatedUser {
            user_id: user.id,
            username: user.username.clone(),
            role: user.role,
            province_id: user.province_id,
        };
        let issued = self.tokens.issue(&identity)?;

        tracing::info!("User {} logged in", user.id);

        Ok(LoginResponseDto {
            access_token: issued.access_token,
            token_type: "Bearer".to_string(),
            expires_in: issued.expires_in,
            user: AuthUserDto::from(identity),
        })
    }
}
