use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::duplicates::models::DuplicateGroup;
use crate::features::families::dtos::MemberResponseDto;
use crate::shared::validation::not_blank;

/// Members sharing first name, last name (case-insensitive) and birth date text
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DuplicateGroupDto {
    /// Lower-cased first name
    pub first_name: String,
    /// Lower-cased last name
    pub last_name: String,
    pub date_of_birth: Option<String>,
    pub count: usize,
    /// Earliest inserted first; resolution keeps `members[0]`
    pub members: Vec<MemberResponseDto>,
}

impl From<DuplicateGroup> for DuplicateGroupDto {
    fn from(group: DuplicateGroup) -> Self {
        Self {
            first_name: group.key.first_name,
            last_name: group.key.last_name,
            date_of_birth: group.key.date_of_birth,
            count: group.members.len(),
            members: group
                .members
                .into_iter()
                .map(MemberResponseDto::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ResolveGroupDto {
    #[validate(custom(function = "not_blank"))]
    pub first_name: String,
    #[validate(custom(function = "not_blank"))]
    pub last_name: String,
    /// Matched verbatim; `null` matches members without a birth date
    pub date_of_birth: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResolveOutcomeDto {
    /// Member left in place, if the key matched anything
    pub kept_member_id: Option<i64>,
    pub deleted: u64,
}
