use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Image attachment, written once at product creation and never mutated on
/// its own. `img_url` holds the storage key returned by the image store;
/// public URLs are resolved at read time.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub id: i32,
    pub product_id: i32,
    pub img_url: String,
    pub created_at: DateTime<Utc>,
}
