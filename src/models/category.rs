use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Category row. No ownership concept: any authenticated user may create or
/// rename any category.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
