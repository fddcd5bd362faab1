use serde_json::Value;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::zones::dtos::{
    AssignZoneDto, ZoneImportResultDto, ZoneOwnerDto, ZoneResponseDto,
};
use crate::features::zones::models::{
    like_pattern, parse_import_row, UserSummary, Zone, ZoneWithOwner, ZONE_COLUMNS,
};
use crate::modules::tabular::Row;

/// Upper bound on picker results
const USER_SEARCH_LIMIT: i64 = 20;

/// Zone ownership by user: single assignment, bulk import, lookup
pub struct ZoneService {
    pool: PgPool,
}

impl ZoneService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn assign_zone(&self, dto: AssignZoneDto) -> Result<ZoneResponseDto> {
        let sql = format!(
            "INSERT INTO zones (user_id, geometry) VALUES ($1, $2) RETURNING {}",
            ZONE_COLUMNS
        );

        let zone = sqlx::query_as::<_, Zone>(&sql)
            .bind(dto.user_id)
            .bind(&dto.geometry)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if AppError::is_foreign_key_violation(&e) {
                    return AppError::NotFound(format!("User {} not found", dto.user_id));
                }
                tracing::error!("Failed to assign zone to {}: {:?}", dto.user_id, e);
                AppError::Database(e)
            })?;

        tracing::info!("Zone {} assigned to user {}", zone.id, zone.user_id);

        Ok(zone.into())
    }

    /// Replace a zone's geometry wholesale
    pub async fn update_zone(&self, zone_id: i64, geometry: Value) -> Result<ZoneResponseDto> {
        let sql = format!(
            r#"
            UPDATE zones
            SET geometry = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            ZONE_COLUMNS
        );

        let zone = sqlx::query_as::<_, Zone>(&sql)
            .bind(zone_id)
            .bind(&geometry)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update zone {}: {:?}", zone_id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Zone {} not found", zone_id)))?;

        tracing::info!("Zone {} geometry replaced", zone.id);

        Ok(zone.into())
    }

    /// Import zones from parsed tabular rows.
    ///
    /// Rows that fail to parse, or whose user does not exist, are skipped.
    /// Only the number of inserted zones is reported.
    pub async fn bulk_import_zones(&self, rows: &[Row]) -> Result<ZoneImportResultDto> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to start zone import: {:?}", e);
            AppError::Database(e)
        })?;

        let mut imported = 0u64;
        for (index, row) in rows.iter().enumerate() {
            let Some(parsed) = parse_import_row(row) else {
                tracing::debug!("Skipping malformed zone row {}", index + 1);
                continue;
            };

            let inserted = sqlx::query(
                r#"
                INSERT INTO zones (user_id, geometry)
                SELECT $1, $2
                WHERE EXISTS (SELECT 1 FROM users WHERE id = $1)
                "#,
            )
            .bind(parsed.user_id)
            .bind(&parsed.geometry)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to import zone row {}: {:?}", index + 1, e);
                AppError::Database(e)
            })?
            .rows_affected();

            if inserted == 0 {
                tracing::debug!(
                    "Skipping zone row {}: user {} not found",
                    index + 1,
                    parsed.user_id
                );
            }
            imported += inserted;
        }

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit zone import: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("Zone import: {} of {} rows imported", imported, rows.len());

        Ok(ZoneImportResultDto {
            imported,
            total_rows: rows.len(),
        })
    }

    /// All zones with their owner, optionally for one owner only
    pub async fn list_zones(&self, owner_id: Option<i64>) -> Result<Vec<ZoneResponseDto>> {
        let zones = sqlx::query_as::<_, ZoneWithOwner>(
            r#"
            SELECT z.id, z.user_id, z.geometry, z.created_at, z.updated_at,
                   u.username, u.role
            FROM zones z
            JOIN users u ON u.id = z.user_id
            WHERE $1::BIGINT IS NULL OR z.user_id = $1
            ORDER BY z.id ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list zones: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(zones.into_iter().map(ZoneResponseDto::from).collect())
    }

    /// Case-insensitive username substring search for the assignment picker
    pub async fn search_users(&self, query: &str) -> Result<Vec<ZoneOwnerDto>> {
        let users = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT id, username, role
            FROM users
            WHERE username ILIKE $1
            ORDER BY username ASC
            LIMIT $2
            "#,
        )
        .bind(like_pattern(query))
        .bind(USER_SEARCH_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to search users: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(users.into_iter().map(ZoneOwnerDto::from).collect())
    }
}
