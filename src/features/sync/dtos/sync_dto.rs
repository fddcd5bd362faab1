use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Short view of a family still waiting to be synchronized
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PendingFamilyDto {
    pub id: i64,
    pub name: String,
    pub city: Option<String>,
    pub district: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SyncStatusDto {
    pub pending: usize,
    pub families: Vec<PendingFamilyDto>,
}

impl From<Vec<PendingFamilyDto>> for SyncStatusDto {
    fn from(families: Vec<PendingFamilyDto>) -> Self {
        Self {
            pending: families.len(),
            families,
        }
    }
}
