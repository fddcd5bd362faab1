use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::families::dtos::FamilyResponseDto;
use crate::features::families::models::{Family, FAMILY_COLUMNS};
use crate::features::sync::dtos::{PendingFamilyDto, SyncStatusDto};

/// Tracks which families a creator still has to synchronize.
///
/// Every query is scoped to one creator id; there is no path to read or
/// acknowledge another user's pending records.
pub struct SyncService {
    pool: PgPool,
}

impl SyncService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Unsynced families created by `user_id`, oldest first
    pub async fn get_pending(&self, user_id: i64) -> Result<Vec<FamilyResponseDto>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM families
            WHERE created_by_id = $1 AND is_synced = FALSE
            ORDER BY created_at ASC, id ASC
            "#,
            FAMILY_COLUMNS
        );

        let families = sqlx::query_as::<_, Family>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch pending families for {}: {:?}", user_id, e);
                AppError::Database(e)
            })?;

        Ok(families.into_iter().map(FamilyResponseDto::from).collect())
    }

    pub async fn status(&self, user_id: i64) -> Result<SyncStatusDto> {
        let families = sqlx::query_as::<_, PendingFamilyDto>(
            r#"
            SELECT id, name, city, district, created_at
            FROM families
            WHERE created_by_id = $1 AND is_synced = FALSE
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch sync status for {}: {:?}", user_id, e);
            AppError::Database(e)
        })?;

        Ok(SyncStatusDto::from(families))
    }

    /// Mark every pending family of `user_id` as synced.
    ///
    /// Returns the number of rows that changed, so a repeated call with
    /// nothing new pending returns 0.
    pub async fn force_sync(&self, user_id: i64) -> Result<u64> {
        let synced = sqlx::query(
            r#"
            UPDATE families
            SET is_synced = TRUE
            WHERE created_by_id = $1 AND is_synced = FALSE
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to force sync for {}: {:?}", user_id, e);
            AppError::Database(e)
        })?
        .rows_affected();

        tracing::info!("Force sync for user {}: {} families", user_id, synced);

        Ok(synced)
    }
}
