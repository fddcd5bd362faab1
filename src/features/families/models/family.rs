use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for a registered household
#[derive(Debug, Clone, FromRow)]
pub struct Family {
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

/// Database model for a person belonging to a family
#[derive(Debug, Clone, FromRow)]
pub struct Member {
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

pub const FAMILY_COLUMNS: &str = "id, name, first_name, last_name, date_of_birth, gender, \
    nationality, id_type, id_number, place_of_birth, province, city, district, latitude, \
    longitude, photo_path, fill_duration, is_validated, is_synced, created_at, created_by_id";

pub const MEMBER_COLUMNS: &str = "id, family_id, first_name, last_name, role, date_of_birth, \
    gender, nationality, id_type, id_number, place_of_birth, province, city, district";

/// Who submitted a family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionChannel {
    /// Authenticated field agent; the record is trusted
    Agent,
    /// Anonymous public form; the record awaits validation
    Public,
}

impl SubmissionChannel {
    pub fn is_validated(&self) -> bool {
        matches!(self, SubmissionChannel::Agent)
    }
}
