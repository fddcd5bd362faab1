use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::features::auth::model::Role;
use crate::features::zones::models::{UserSummary, Zone, ZoneWithOwner};
use crate::modules::tabular::Row;

/// Geometry must be an object or array; its contents are never inspected
fn validate_geometry(geometry: &Value) -> Result<(), ValidationError> {
    match geometry {
        Value::Object(_) | Value::Array(_) => Ok(()),
        _ => Err(ValidationError::new("geometry_must_be_object_or_array")),
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AssignZoneDto {
    pub user_id: i64,
    #[validate(custom(function = "validate_geometry"))]
    #[schema(value_type = Object)]
    pub geometry: Value,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateZoneDto {
    #[validate(custom(function = "validate_geometry"))]
    #[schema(value_type = Object)]
    pub geometry: Value,
}

/// Upload form for zone import, for OpenAPI documentation only.
/// The handler reads the multipart body directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct ImportZonesFileDto {
    /// `.csv` or `.xlsx` file, first row is the header
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

/// Already-parsed rows, as sent by tooling that reads the spreadsheet itself
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ImportZoneRowsDto {
    #[schema(value_type = Vec<Object>)]
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ZoneImportResultDto {
    pub imported: u64,
    pub total_rows: usize,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ZoneListQuery {
    /// Only zones owned by this user
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct UserSearchQuery {
    /// Case-insensitive substring of the username
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ZoneOwnerDto {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

impl From<UserSummary> for ZoneOwnerDto {
    fn from(u: UserSummary) -> Self {
        Self {
            id: u.id,
            username: u.username,
            role: u.role,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ZoneResponseDto {
    pub id: i64,
    pub user_id: i64,
    #[schema(value_type = Object)]
    pub geometry: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<ZoneOwnerDto>,
}

impl From<Zone> for ZoneResponseDto {
    fn from(z: Zone) -> Self {
        Self {
            id: z.id,
            user_id: z.user_id,
            geometry: z.geometry,
            created_at: z.created_at,
            updated_at: z.updated_at,
            owner: None,
        }
    }
}

impl From<ZoneWithOwner> for ZoneResponseDto {
    fn from(z: ZoneWithOwner) -> Self {
        Self {
            id: z.id,
            user_id: z.user_id,
            geometry: z.geometry,
            created_at: z.created_at,
            updated_at: z.updated_at,
            owner: Some(ZoneOwnerDto {
                id: z.user_id,
                username: z.username,
                role: z.role,
            }),
        }
    }
}
