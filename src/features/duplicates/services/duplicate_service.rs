use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::duplicates::dtos::{DuplicateGroupDto, ResolveGroupDto, ResolveOutcomeDto};
use crate::features::duplicates::models::{
    group_duplicates, split_keep_first, DuplicateCandidate,
};

/// Key expression shared by listing, counting and resolution so that every
/// path agrees on what "the same person" means.
const KEY_MATCH: &str = "LOWER(m.first_name) = g.first_name_key \
    AND LOWER(m.last_name) = g.last_name_key \
    AND m.date_of_birth IS NOT DISTINCT FROM g.date_of_birth";

pub struct DuplicateService {
    pool: PgPool,
}

impl DuplicateService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Every group of two or more members sharing a key, earliest member first
    pub async fn find_duplicate_groups(&self) -> Result<Vec<DuplicateGroupDto>> {
        let sql = format!(
            r#"
            WITH g AS (
                SELECT LOWER(first_name) AS first_name_key,
                       LOWER(last_name) AS last_name_key,
                       date_of_birth
                FROM members
                GROUP BY LOWER(first_name), LOWER(last_name), date_of_birth
                HAVING COUNT(*) > 1
            )
            SELECT g.first_name_key, g.last_name_key,
                   m.id, m.family_id, m.first_name, m.last_name, m.role, m.date_of_birth,
                   m.gender, m.nationality, m.id_type, m.id_number, m.place_of_birth,
                   m.province, m.city, m.district
            FROM members m
            JOIN g ON {}
            ORDER BY m.id ASC
            "#,
            KEY_MATCH
        );

        let candidates = sqlx::query_as::<_, DuplicateCandidate>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to scan for duplicate members: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(group_duplicates(candidates)
            .into_iter()
            .map(DuplicateGroupDto::from)
            .collect())
    }

    /// Number of duplicate groups, for the overview
    pub async fn count_duplicate_groups(&self) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM (
                SELECT 1
                FROM members
                GROUP BY LOWER(first_name), LOWER(last_name), date_of_birth
                HAVING COUNT(*) > 1
            ) g
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count duplicate groups: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Keep the earliest member matching the key and delete the rest.
    ///
    /// Matching nothing, or a single member, is a no-op.
    pub async fn resolve_group(&self, dto: ResolveGroupDto) -> Result<ResolveOutcomeDto> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to start duplicate resolution: {:?}", e);
            AppError::Database(e)
        })?;

        let ids = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT id
            FROM members
            WHERE LOWER(first_name) = LOWER($1)
              AND LOWER(last_name) = LOWER($2)
              AND date_of_birth IS NOT DISTINCT FROM $3
            ORDER BY id ASC
            FOR UPDATE
            "#,
        )
        .bind(dto.first_name.trim())
        .bind(dto.last_name.trim())
        .bind(dto.date_of_birth.as_deref())
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to lock duplicate group: {:?}", e);
            AppError::Database(e)
        })?;

        let (kept, doomed) = split_keep_first(&ids);

        let deleted = if doomed.is_empty() {
            0
        } else {
            sqlx::query("DELETE FROM members WHERE id = ANY($1)")
                .bind(&doomed)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to delete duplicate members: {:?}", e);
                    AppError::Database(e)
                })?
                .rows_affected()
        };

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit duplicate resolution: {:?}", e);
            AppError::Database(e)
        })?;

        if deleted > 0 {
            tracing::info!(
                "Resolved duplicate group ({} {}): kept {:?}, deleted {}",
                dto.first_name,
                dto.last_name,
                kept,
                deleted
            );
        }

        Ok(ResolveOutcomeDto {
            kept_member_id: kept,
            deleted,
        })
    }

    /// Delete one member by id. Deleting an absent member is a no-op.
    pub async fn resolve_single(&self, member_id: i64) -> Result<u64> {
        let deleted = sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(member_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete member {}: {:?}", member_id, e);
                AppError::Database(e)
            })?
            .rows_affected();

        if deleted > 0 {
            tracing::info!("Removed duplicate member {}", member_id);
        }

        Ok(deleted)
    }
}
