use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::families::dtos::RootPersonDto;
use crate::features::families::models::Member;
use crate::shared::constants::TARGET_PERSON_ROLE;
use crate::shared::validation::not_blank;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateMemberDto {
    #[validate(custom(function = "not_blank"), length(max = 150))]
    pub first_name: String,
    #[validate(custom(function = "not_blank"), length(max = 150))]
    pub last_name: String,
    /// Relationship label, e.g. "spouse" or "child"
    #[validate(length(max = 100))]
    pub role: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub id_type: Option<String>,
    pub id_number: Option<String>,
    pub place_of_birth: Option<String>,
    pub province: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
}

impl CreateMemberDto {
    /// The member row mirroring a family's root person
    pub fn target_person(root: &RootPersonDto) -> Self {
        Self {
            first_name: root.first_name.clone(),
            last_name: root.last_name.clone(),
            role: Some(TARGET_PERSON_ROLE.to_string()),
            date_of_birth: Some(root.date_of_birth.clone()),
            gender: Some(root.gender.clone()),
            nationality: Some(root.nationality.clone()),
            id_type: Some(root.id_type.clone()),
            id_number: Some(root.id_number.clone()),
            place_of_birth: Some(root.place_of_birth.clone()),
            province: Some(root.province.clone()),
            city: Some(root.city.clone()),
            district: Some(root.district.clone()),
        }
    }
}

/// Partial update: only present keys are applied
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateMemberDto {
    #[validate(custom(function = "not_blank"), length(max = 150))]
    pub first_name: Option<String>,
    #[validate(custom(function = "not_blank"), length(max = 150))]
    pub last_name: Option<String>,
    #[validate(length(max = 100))]
    pub role: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub id_type: Option<String>,
    pub id_number: Option<String>,
    pub place_of_birth: Option<String>,
    pub province: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MemberResponseDto {
    pub id: i64,
    pub family_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub role: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub id_type: Option<String>,
    pub id_number: Option<String>,
    pub place_of_birth: Option<String>,
    pub province: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
}

impl From<Member> for MemberResponseDto {
    fn from(m: Member) -> Self {
        Self {
            id: m.id,
            family_id: m.family_id,
            first_name: m.first_name,
            last_name: m.last_name,
            role: m.role,
            date_of_birth: m.date_of_birth,
            gender: m.gender,
            nationality: m.nationality,
            id_type: m.id_type,
            id_number: m.id_number,
            place_of_birth: m.place_of_birth,
            province: m.province,
            city: m.city,
            district: m.district,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_person_mirrors_root_identity() {
        let root = RootPersonDto {
            first_name: "Jean".into(),
            last_name: "Mba".into(),
            date_of_birth: "1990-01-01".into(),
            gender: "M".into(),
            nationality: "Gabonaise".into(),
            id_type: "CNI".into(),
            id_number: "123".into(),
            place_of_birth: "Oyem".into(),
            province: "Estuaire".into(),
            city: "Libreville".into(),
            district: "Louis".into(),
        };

        let member = CreateMemberDto::target_person(&root);
        assert_eq!(member.role.as_deref(), Some(TARGET_PERSON_ROLE));
        assert_eq!(member.first_name, root.first_name);
        assert_eq!(member.last_name, root.last_name);
        assert_eq!(member.date_of_birth.as_deref(), Some("1990-01-01"));
        assert_eq!(member.id_number.as_deref(), Some("123"));
        assert_eq!(member.district.as_deref(), Some("Louis"));
        assert!(member.validate().is_ok());
    }

    #[test]
    fn test_member_requires_names() {
        let json = r#"{"first_name":"","last_name":"Mba"}"#;
        let dto: CreateMemberDto = serde_json::from_str(json).unwrap();
        assert!(dto.validate().is_err());
    }
}
