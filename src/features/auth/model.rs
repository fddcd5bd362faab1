use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

/// Account roles, stored as their canonical snake_case name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperUser,
    ProvincialSupervisor,
    FieldAgent,
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperUser => "super_user",
            Role::ProvincialSupervisor => "provincial_supervisor",
            Role::FieldAgent => "field_agent",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    /// Accepts the legacy supervisor aliases still present in older data
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "super_user" | "super_utilisateur" => Ok(Role::SuperUser),
            "provincial_supervisor" | "super_admin" | "superviseur_provincial" => {
                Ok(Role::ProvincialSupervisor)
            }
            "field_agent" | "agent" => Ok(Role::FieldAgent),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = UnknownRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Identity resolved from a bearer token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
    pub province_id: Option<i64>,
}

impl AuthenticatedUser {
    pub fn is_super_user(&self) -> bool {
        self.role == Role::SuperUser
    }

    /// Super-user or provincial supervisor
    pub fn is_super_tier(&self) -> bool {
        super::access::is_super_tier(self.role)
    }

    /// Whether this actor may act on records tied to `target_province`
    pub fn owns_province(&self, target_province: Option<i64>) -> bool {
        super::access::owns_province(self.role, self.province_id, target_province)
    }
}
