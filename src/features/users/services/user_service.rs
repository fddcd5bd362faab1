use sqlx::PgPool;

use crate::core::config::BootstrapConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::access::can_assign_role;
use crate::features::auth::model::{AuthenticatedUser, Role};
use crate::features::auth::services::credential_service;
use crate::features::users::dtos::{CreateUserDto, ProvinceResponseDto, UserResponseDto};
use crate::features::users::models::{Province, UserWithProvince};
use crate::shared::constants::SEED_PROVINCES;

const USER_WITH_PROVINCE_SELECT: &str = r#"
    SELECT u.id, u.username, u.role, u.province_id, p.name AS province_name, u.created_at
    FROM users u
    LEFT JOIN provinces p ON p.id = u.province_id
"#;

/// Result of the super-user provisioning routine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    Created(i64),
    AlreadyPresent(i64),
}

/// Service for user accounts and provinces
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Province the new account lands in once scoping rules are applied
    fn resolve_target_province(actor: &AuthenticatedUser, requested: Option<i64>) -> Option<i64> {
        if actor.is_super_user() {
            requested
        } else {
            requested.or(actor.province_id)
        }
    }

    /// Create a user account. Supervisors may only create accounts in their
    /// own province and never a super-user.
    pub async fn create_user(
        &self,
        actor: &AuthenticatedUser,
        dto: CreateUserDto,
    ) -> Result<UserResponseDto> {
        if !can_assign_role(actor.role, dto.role) {
            return Err(AppError::Forbidden(format!(
                "Not allowed to create a {} account",
                dto.role
            )));
        }

        let province_id = Self::resolve_target_province(actor, dto.province_id);
        if !actor.owns_province(province_id) {
            return Err(AppError::Forbidden(
                "Users can only be created in your own province".to_string(),
            ));
        }

        let username = dto.username.trim().to_string();
        let password_hash = credential_service::hash_password_blocking(dto.password).await?;

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (username, password_hash, role, province_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&username)
        .bind(&password_hash)
        .bind(dto.role.as_str())
        .bind(province_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if AppError::is_unique_violation(&e) {
                AppError::Conflict(format!("Username '{}' is already taken", username))
            } else if AppError::is_foreign_key_violation(&e) {
                AppError::NotFound("Province not found".to_string())
            } else {
                tracing::error!("Failed to create user: {:?}", e);
                AppError::Database(e)
            }
        })?;

        tracing::info!(
            "User {} ({}) created by {} in province {:?}",
            id,
            dto.role,
            actor.user_id,
            province_id
        );

        self.fetch_user(id)
            .await?
            .map(UserResponseDto::from)
            .ok_or_else(|| AppError::Internal("Created user vanished".to_string()))
    }

    /// Super-user sees every account ordered by province name; a supervisor
    /// sees their own province only.
    pub async fn list_users(&self, actor: &AuthenticatedUser) -> Result<Vec<UserResponseDto>> {
        let result = if actor.is_super_user() {
            let sql = format!(
                "{} ORDER BY p.name NULLS LAST, u.username",
                USER_WITH_PROVINCE_SELECT
            );
            sqlx::query_as::<_, UserWithProvince>(&sql)
                .fetch_all(&self.pool)
                .await
        } else {
            let Some(province_id) = actor.province_id else {
                return Ok(Vec::new());
            };
            let sql = format!(
                "{} WHERE u.province_id = $1 ORDER BY u.username",
                USER_WITH_PROVINCE_SELECT
            );
            sqlx::query_as::<_, UserWithProvince>(&sql)
                .bind(province_id)
                .fetch_all(&self.pool)
                .await
        };

        let users = result.map_err(|e| {
            tracing::error!("Failed to list users: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(users.into_iter().map(UserResponseDto::from).collect())
    }

    pub async fn get_user(&self, actor: &AuthenticatedUser, id: i64) -> Result<UserResponseDto> {
        let user = self
            .fetch_user(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

        if !actor.owns_province(user.province_id) {
            return Err(AppError::Forbidden(
                "User belongs to another province".to_string(),
            ));
        }

        Ok(user.into())
    }

    /// Delete an account. Zones assigned to it go with it; families it
    /// registered stay, detached from their creator.
    pub async fn delete_user(&self, actor: &AuthenticatedUser, id: i64) -> Result<()> {
        if actor.user_id == id {
            return Err(AppError::BadRequest(
                "You cannot delete your own account".to_string(),
            ));
        }

        let user = self
            .fetch_user(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

        if !actor.owns_province(user.province_id) || !can_assign_role(actor.role, user.role) {
            return Err(AppError::Forbidden(
                "Not allowed to delete this user".to_string(),
            ));
        }

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete user {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        tracing::info!("User {} deleted by {}", id, actor.user_id);
        Ok(())
    }

    async fn fetch_user(&self, id: i64) -> Result<Option<UserWithProvince>> {
        let sql = format!("{} WHERE u.id = $1", USER_WITH_PROVINCE_SELECT);
        sqlx::query_as::<_, UserWithProvince>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch user {}: {:?}", id, e);
                AppError::Database(e)
            })
    }

    pub async fn list_provinces(&self) -> Result<Vec<ProvinceResponseDto>> {
        let provinces = sqlx::query_as::<_, Province>("SELECT id, name FROM provinces ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list provinces: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(provinces.into_iter().map(ProvinceResponseDto::from).collect())
    }

    /// Insert the reference provinces that are missing. Returns how many were added.
    pub async fn seed_provinces(&self) -> Result<u64> {
        let names: Vec<String> = SEED_PROVINCES.iter().map(|s| s.to_string()).collect();

        let result = sqlx::query(
            r#"
            INSERT INTO provinces (name)
            SELECT UNNEST($1::TEXT[])
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(&names)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to seed provinces: {:?}", e);
            AppError::Database(e)
        })?;

        let inserted = result.rows_affected();
        tracing::info!("Seeded {} province(s)", inserted);
        Ok(inserted)
    }

    /// Create the configured super-user unless an account with that username exists.
    /// Running it twice is harmless.
    pub async fn provision_superuser(&self, config: &BootstrapConfig) -> Result<ProvisionOutcome> {
        let username = config.username.trim();

        if let Some(id) = self.find_user_id(username).await? {
            return Ok(ProvisionOutcome::AlreadyPresent(id));
        }

        let province_id = match &config.province {
            Some(name) => Some(
                sqlx::query_scalar::<_, i64>("SELECT id FROM provinces WHERE LOWER(name) = LOWER($1)")
                    .bind(name.trim())
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(AppError::Database)?
                    .ok_or_else(|| AppError::NotFound(format!("Province '{}' not found", name)))?,
            ),
            None => None,
        };

        let password_hash =
            credential_service::hash_password_blocking(config.password.clone()).await?;

        let inserted = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (username, password_hash, role, province_id)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (username) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(username)
        .bind(&password_hash)
        .bind(Role::SuperUser.as_str())
        .bind(province_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to provision super-user: {:?}", e);
            AppError::Database(e)
        })?;

        match inserted {
            Some(id) => {
                tracing::info!("Super-user '{}' provisioned with id {}", username, id);
                Ok(ProvisionOutcome::Created(id))
            }
            // Lost a race with a concurrent provisioning run
            None => self
                .find_user_id(username)
                .await?
                .map(ProvisionOutcome::AlreadyPresent)
                .ok_or_else(|| AppError::Internal("Super-user provisioning conflict".to_string())),
        }
    }

    async fn find_user_id(&self, username: &str) -> Result<Option<i64>> {
        sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to look up user '{}': {:?}", username, e);
                AppError::Database(e)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role, province_id: Option<i64>) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: 1,
            username: "actor".to_string(),
            role,
            province_id,
        }
    }

    #[test]
    fn test_supervisor_defaults_to_own_province() {
        let supervisor = actor(Role::ProvincialSupervisor, Some(4));
        assert_eq!(UserService::resolve_target_province(&supervisor, None), Some(4));
        assert_eq!(
            UserService::resolve_target_province(&supervisor, Some(7)),
            Some(7)
        );
    }

    #[test]
    fn test_super_user_keeps_requested_province() {
        let root = actor(Role::SuperUser, Some(4));
        assert_eq!(UserService::resolve_target_province(&root, None), None);
        assert_eq!(UserService::resolve_target_province(&root, Some(7)), Some(7));
    }
}
