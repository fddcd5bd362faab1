use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Datelike, Utc};
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::duplicates::DuplicateService;
use crate::features::statistics::dtos::{
    AgentActivityDto, OverviewDto, PageStatsDto, PageStatsQuery,
};
use crate::features::statistics::models::BirthYearFilter;
use crate::shared::constants::DEFAULT_OVERVIEW_CITY;

const BIRTH_YEAR: &str = "substr(date_of_birth, 1, 4)";

/// Read-only rollups over the registry; nothing here is persisted
pub struct StatisticsService {
    pool: PgPool,
    duplicates: Arc<DuplicateService>,
}

impl StatisticsService {
    pub fn new(pool: PgPool, duplicates: Arc<DuplicateService>) -> Self {
        Self { pool, duplicates }
    }

    pub async fn page_stats(&self, query: &PageStatsQuery) -> Result<PageStatsDto> {
        let filter = BirthYearFilter::resolve(query.year, query.since, Utc::now().year());

        let total_families = self.count("SELECT COUNT(*) FROM families").await?;

        let total_members = match filter.condition() {
            None => self.count("SELECT COUNT(*) FROM members").await?,
            Some((op, value)) => {
                let sql = format!(
                    "SELECT COUNT(*) FROM members WHERE {} {} $1",
                    BIRTH_YEAR, op
                );
                sqlx::query_scalar::<_, i64>(&sql)
                    .bind(value)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| {
                        tracing::error!("Failed to count filtered members: {:?}", e);
                        AppError::Database(e)
                    })?
            }
        };

        Ok(PageStatsDto {
            total_families,
            total_members,
            genders: self.count_by("gender", None, filter).await?,
            provinces: self.count_by("province", None, filter).await?,
            roles: self.count_by("role", None, filter).await?,
            cities: self.count_by("city", None, filter).await?,
            birth_years: self
                .count_by(BIRTH_YEAR, Some("date_of_birth LIKE '____-%'"), filter)
                .await?,
            year_filter: query.year,
            since_filter: query.since,
        })
    }

    /// Dashboard totals; `city` defaults to Libreville
    pub async fn overview(&self, city: Option<&str>) -> Result<OverviewDto> {
        let city = city
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_OVERVIEW_CITY)
            .to_string();

        let city_members = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM members WHERE LOWER(city) = LOWER($1)",
        )
        .bind(&city)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count members in {}: {:?}", city, e);
            AppError::Database(e)
        })?;

        Ok(OverviewDto {
            total_users: self.count("SELECT COUNT(*) FROM users").await?,
            total_families: self.count("SELECT COUNT(*) FROM families").await?,
            total_members: self.count("SELECT COUNT(*) FROM members").await?,
            city,
            city_members,
            duplicate_groups: self.duplicates.count_duplicate_groups().await?,
        })
    }

    /// Families registered per account, busiest first
    pub async fn agent_activity(&self) -> Result<Vec<AgentActivityDto>> {
        sqlx::query_as::<_, AgentActivityDto>(
            r#"
            SELECT u.id AS user_id, u.username, u.role, COUNT(f.id) AS families
            FROM users u
            LEFT JOIN families f ON f.created_by_id = u.id
            GROUP BY u.id, u.username, u.role
            ORDER BY families DESC, u.username ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to compute agent activity: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn count(&self, sql: &str) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to run count '{}': {:?}", sql, e);
                AppError::Database(e)
            })
    }

    /// Member counts grouped by `column`, skipping null and empty buckets.
    /// `column` is always one of our own expressions, never user input.
    async fn count_by(
        &self,
        column: &str,
        extra: Option<&str>,
        filter: BirthYearFilter,
    ) -> Result<BTreeMap<String, i64>> {
        let mut conditions = vec![
            format!("{} IS NOT NULL", column),
            format!("{} <> ''", column),
        ];
        if let Some(extra) = extra {
            conditions.push(extra.to_string());
        }
        let condition = filter.condition();
        if let Some((op, _)) = &condition {
            conditions.push(format!("{} {} $1", BIRTH_YEAR, op));
        }

        let sql = format!(
            "SELECT {col} AS bucket, COUNT(*) AS total FROM members WHERE {cond} GROUP BY {col}",
            col = column,
            cond = conditions.join(" AND ")
        );

        let mut query = sqlx::query_as::<_, (String, i64)>(&sql);
        if let Some((_, value)) = condition {
            query = query.bind(value);
        }

        let rows = query.fetch_all(&self.pool).await.map_err(|e| {
            tracing::error!("Failed to group members by {}: {:?}", column, e);
            AppError::Database(e)
        })?;

        Ok(rows.into_iter().collect())
    }
}
