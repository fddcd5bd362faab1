use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;

use crate::features::auth::model::Role;

/// Database model for a zone; the geometry is stored and returned verbatim
#[derive(Debug, Clone, FromRow)]
pub struct Zone {
    pub id: i64,
    pub user_id: i64,
    pub geometry: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Zone joined with its owner, for listings
#[derive(Debug, Clone, FromRow)]
pub struct ZoneWithOwner {
    pub id: i64,
    pub user_id: i64,
    pub geometry: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub username: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
}

/// id/username/role triple used by the assignment picker
#[derive(Debug, Clone, FromRow)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
}

pub const ZONE_COLUMNS: &str = "id, user_id, geometry, created_at, updated_at";

/// Escape `%`, `_` and `\` so user input matches literally inside ILIKE
pub fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_wraps_and_escapes() {
        assert_eq!(like_pattern("agent"), "%agent%");
        assert_eq!(like_pattern(" agent "), "%agent%");
        assert_eq!(like_pattern("a_b%"), "%a\\_b\\%%");
        assert_eq!(like_pattern(""), "%%");
    }
}
