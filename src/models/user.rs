use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Marketplace account. The bcrypt hash never leaves the process: `password`
/// is skipped during serialization so no response body can carry it.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
