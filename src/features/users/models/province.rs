use sqlx::FromRow;

/// Database model for a province (seeded reference data)
#[derive(Debug, Clone, FromRow)]
pub struct Province {
    pub id: i64,
    pub name: String,
}
