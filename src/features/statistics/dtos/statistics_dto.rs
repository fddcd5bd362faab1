use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::auth::model::Role;

#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
pub struct PageStatsQuery {
    /// Only members born in this year
    #[validate(range(min = 0, max = 9999, message = "year must be between 0 and 9999"))]
    #[param(minimum = 0, maximum = 9999)]
    pub year: Option<i32>,
    /// Only members born in the last N years (ignored when `year` is set)
    #[validate(range(min = 0, max = 150, message = "since must be between 0 and 150"))]
    #[param(minimum = 0, maximum = 150)]
    pub since: Option<i32>,
}

/// Registry rollups. Family total is unfiltered; every member figure
/// honors the birth-year filter.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PageStatsDto {
    pub total_families: i64,
    pub total_members: i64,
    pub genders: BTreeMap<String, i64>,
    pub provinces: BTreeMap<String, i64>,
    pub roles: BTreeMap<String, i64>,
    pub cities: BTreeMap<String, i64>,
    /// Keyed by four-character year
    pub birth_years: BTreeMap<String, i64>,
    pub year_filter: Option<i32>,
    pub since_filter: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct OverviewQuery {
    /// City to count members in (case-insensitive, default Libreville)
    pub city: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OverviewDto {
    pub total_users: i64,
    pub total_families: i64,
    pub total_members: i64,
    pub city: String,
    pub city_members: i64,
    pub duplicate_groups: i64,
}

/// Families registered by one account
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AgentActivityDto {
    pub user_id: i64,
    pub username: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub families: i64,
}
