use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::core::error::AppError;
use crate::features::families::dtos::MemberResponseDto;
use crate::features::families::models::Family;
use crate::shared::validation::not_blank;

/// Identity of the family's root person. Every field is required at intake.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct RootPersonDto {
    #[validate(custom(function = "not_blank"), length(max = 150))]
    pub first_name: String,
    #[validate(custom(function = "not_blank"), length(max = 150))]
    pub last_name: String,
    /// Free text, compared verbatim by duplicate detection
    #[validate(custom(function = "not_blank"), length(max = 50))]
    pub date_of_birth: String,
    #[validate(custom(function = "not_blank"), length(max = 50))]
    pub gender: String,
    #[validate(custom(function = "not_blank"), length(max = 100))]
    pub nationality: String,
    #[validate(custom(function = "not_blank"), length(max = 100))]
    pub id_type: String,
    #[validate(custom(function = "not_blank"), length(max = 100))]
    pub id_number: String,
    #[validate(custom(function = "not_blank"), length(max = 150))]
    pub place_of_birth: String,
    #[validate(custom(function = "not_blank"), length(max = 150))]
    pub province: String,
    #[validate(custom(function = "not_blank"), length(max = 150))]
    pub city: String,
    #[validate(custom(function = "not_blank"), length(max = 150))]
    pub district: String,
}

/// Photo as the offline client stores it: `{name, type, data}` with a data URL
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct OfflinePhotoDto {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    /// `data:<mime>;base64,<payload>`
    pub data: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateFamilyDto {
    #[validate(custom(function = "not_blank"), length(max = 200))]
    pub name: String,

    #[serde(flatten)]
    #[validate(nested)]
    pub root: RootPersonDto,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,

    /// Minutes spent filling the intake form
    #[validate(range(min = 0))]
    pub fill_duration: Option<i32>,

    /// Only used by the JSON intake; multipart sends a file part instead
    #[serde(default)]
    pub photo: Option<OfflinePhotoDto>,
}

fn optional_number<T: std::str::FromStr>(
    fields: &HashMap<String, String>,
    key: &str,
) -> Result<Option<T>, AppError> {
    match fields.get(key).map(|v| v.trim()).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| AppError::Validation(format!("{} must be a number", key))),
    }
}

impl CreateFamilyDto {
    /// Build from multipart text fields. Missing text fields become empty and
    /// are rejected by `validate`; malformed numbers are rejected here.
    pub fn from_form(fields: &HashMap<String, String>) -> Result<Self, AppError> {
        let text = |key: &str| fields.get(key).map(|v| v.trim().to_string()).unwrap_or_default();

        Ok(Self {
            name: text("name"),
            root: RootPersonDto {
                first_name: text("first_name"),
                last_name: text("last_name"),
                date_of_birth: text("date_of_birth"),
                gender: text("gender"),
                nationality: text("nationality"),
                id_type: text("id_type"),
                id_number: text("id_number"),
                place_of_birth: text("place_of_birth"),
                province: text("province"),
                city: text("city"),
                district: text("district"),
            },
            latitude: optional_number(fields, "latitude")?,
            longitude: optional_number(fields, "longitude")?,
            fill_duration: optional_number(fields, "fill_duration")?,
            photo: None,
        })
    }
}

/// Partial update: only present keys are applied
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateFamilyDto {
    #[validate(custom(function = "not_blank"), length(max = 200))]
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub id_type: Option<String>,
    pub id_number: Option<String>,
    pub place_of_birth: Option<String>,
    pub province: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    #[validate(range(min = 0))]
    pub fill_duration: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateLocationDto {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateDurationDto {
    /// Minutes spent filling the intake form
    #[validate(range(min = 0))]
    pub fill_duration: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FamilyResponseDto {
    pub id: i64,
    pub name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub id_type: Option<String>,
    pub id_number: Option<String>,
    pub place_of_birth: Option<String>,
    pub province: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub photo_path: Option<String>,
    pub fill_duration: Option<i32>,
    pub is_validated: bool,
    pub is_synced: bool,
    pub created_at: DateTime<Utc>,
    pub created_by_id: Option<i64>,
}

impl From<Family> for FamilyResponseDto {
    fn from(f: Family) -> Self {
        Self {
            id: f.id,
            name: f.name,
            first_name: f.first_name,
            last_name: f.last_name,
            date_of_birth: f.date_of_birth,
            gender: f.gender,
            nationality: f.nationality,
            id_type: f.id_type,
            id_number: f.id_number,
            place_of_birth: f.place_of_birth,
            province: f.province,
            city: f.city,
            district: f.district,
            latitude: f.latitude,
            longitude: f.longitude,
            photo_path: f.photo_path,
            fill_duration: f.fill_duration,
            is_validated: f.is_validated,
            is_synced: f.is_synced,
            created_at: f.created_at,
            created_by_id: f.created_by_id,
        }
    }
}

/// A family with its members, ordered by insertion
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FamilyDetailDto {
    #[serde(flatten)]
    pub family: FamilyResponseDto,
    pub members: Vec<MemberResponseDto>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> HashMap<String, String> {
        [
            ("name", "Famille Mba"),
            ("first_name", "Jean"),
            ("last_name", "Mba"),
            ("date_of_birth", "1990-01-01"),
            ("gender", "M"),
            ("nationality", "Gabonaise"),
            ("id_type", "CNI"),
            ("id_number", "123456"),
            ("place_of_birth", "Oyem"),
            ("province", "Estuaire"),
            ("city", "Libreville"),
            ("district", "Nzeng-Ayong"),
            ("latitude", "0.4162"),
            ("longitude", "9.4673"),
            ("fill_duration", "12"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_complete_form_is_valid() {
        let dto = CreateFamilyDto::from_form(&form()).unwrap();
        assert!(dto.validate().is_ok());
        assert_eq!(dto.root.city, "Libreville");
        assert_eq!(dto.fill_duration, Some(12));
        assert_eq!(dto.latitude, Some(0.4162));
    }

    #[test]
    fn test_missing_root_field_fails_validation() {
        let mut fields = form();
        fields.remove("id_number");
        let dto = CreateFamilyDto::from_form(&fields).unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_blank_name_fails_validation() {
        let mut fields = form();
        fields.insert("name".to_string(), "   ".to_string());
        let dto = CreateFamilyDto::from_form(&fields).unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_numeric_fields_are_optional_but_must_parse() {
        let mut fields = form();
        fields.remove("latitude");
        fields.insert("longitude".to_string(), "".to_string());
        let dto = CreateFamilyDto::from_form(&fields).unwrap();
        assert_eq!(dto.latitude, None);
        assert_eq!(dto.longitude, None);

        fields.insert("fill_duration".to_string(), "twelve".to_string());
        assert!(matches!(
            CreateFamilyDto::from_form(&fields),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_out_of_range_coordinates_fail_validation() {
        let dto = UpdateLocationDto {
            latitude: 120.0,
            longitude: 9.0,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_json_intake_reads_offline_photo() {
        let json = serde_json::json!({
            "name": "Famille Mba",
            "first_name": "Jean", "last_name": "Mba", "date_of_birth": "1990-01-01",
            "gender": "M", "nationality": "Gabonaise", "id_type": "CNI", "id_number": "1",
            "place_of_birth": "Oyem", "province": "Estuaire", "city": "Libreville",
            "district": "Louis",
            "photo": {"name": "p.jpg", "type": "image/jpeg", "data": "data:image/jpeg;base64,AAAA"}
        });
        let dto: CreateFamilyDto = serde_json::from_value(json).unwrap();
        assert!(dto.validate().is_ok());
        assert_eq!(dto.root.first_name, "Jean");
        assert_eq!(
            dto.photo.and_then(|p| p.content_type),
            Some("image/jpeg".to_string())
        );
    }

    #[test]
    fn test_update_rejects_blank_name_but_allows_absent() {
        assert!(UpdateFamilyDto::default().validate().is_ok());
        let dto = UpdateFamilyDto {
            name: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(dto.validate().is_err());
    }
}
