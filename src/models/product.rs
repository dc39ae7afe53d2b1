use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// Product row. Soft-deleted products keep their row with status = 'deleted';
/// they stay queryable for audit but drop out of active listings.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub quantity: i32,
    pub category_id: i32,
    pub user_id: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Owner fields exposed in product listings (id + username only).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OwnerSummary {
    pub id: i32,
    pub username: String,
}

/// Active-listing entry: the product enriched with its owner's username and
/// the resolved image URLs.
#[derive(Debug, Clone, Serialize)]
pub struct ProductListing {
    #[serde(flatten)]
    pub product: Product,
    pub user: OwnerSummary,
    pub images: Vec<String>,
}
