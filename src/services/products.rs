use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;

use crate::error::ApiError;
use crate::models::{OwnerSummary, Product, ProductImage, ProductListing, User};
use crate::services::image_store::{ImageStore, UploadedImage};

/// Validated fields for a new product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub category_id: i32,
    pub quantity: i32,
}

/// Partial update. Category and owner are immutable post-creation, so they
/// have no place here.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub quantity: Option<i32>,
}

pub struct ProductService {
    pool: PgPool,
    images: Arc<dyn ImageStore>,
}

impl ProductService {
    pub fn new(pool: PgPool, images: Arc<dyn ImageStore>) -> Self {
        Self { pool, images }
    }

    /// Create a product owned by `owner`, then attach the uploaded files via
    /// the image store.
    ///
    /// The two steps are not atomic - the image store is a separate system.
    /// If the upload fails we compensate by hard-deleting the just-created
    /// row (it was never visible to anyone) and surface the upload error.
    pub async fn create(
        &self,
        owner: &User,
        fields: NewProduct,
        files: Vec<UploadedImage>,
    ) -> Result<Product, ApiError> {
        let product = sqlx::query_as::<_, Product>(
            "INSERT INTO products (title, description, price, quantity, category_id, user_id, status) \
             VALUES ($1, $2, $3, $4, $5, $6, 'active') RETURNING *",
        )
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(fields.price)
        .bind(fields.quantity)
        .bind(fields.category_id)
        .bind(owner.id)
        .fetch_one(&self.pool)
        .await?;

        if !files.is_empty() {
            match self.images.upload_product_images(product.id, files).await {
                Ok(keys) => {
                    for key in &keys {
                        sqlx::query(
                            "INSERT INTO product_images (product_id, img_url) VALUES ($1, $2)",
                        )
                        .bind(product.id)
                        .bind(key)
                        .execute(&self.pool)
                        .await?;
                    }
                }
                Err(err) => {
                    sqlx::query("DELETE FROM products WHERE id = $1")
                        .bind(product.id)
                        .execute(&self.pool)
                        .await?;
                    return Err(err.into());
                }
            }
        }

        Ok(product)
    }

    /// All active products, each enriched with the owner's username and the
    /// image URLs resolved through the image store in one batch.
    pub async fn list_active(&self) -> Result<Vec<ProductListing>, ApiError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE status = 'active' ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        if products.is_empty() {
            return Ok(Vec::new());
        }

        let product_ids: Vec<i32> = products.iter().map(|p| p.id).collect();
        let owner_ids: Vec<i32> = products.iter().map(|p| p.user_id).collect();

        let owners = sqlx::query_as::<_, OwnerSummary>(
            "SELECT id, username FROM users WHERE id = ANY($1)",
        )
        .bind(&owner_ids)
        .fetch_all(&self.pool)
        .await?;
        let owners_by_id: HashMap<i32, OwnerSummary> =
            owners.into_iter().map(|o| (o.id, o)).collect();

        let image_rows = sqlx::query_as::<_, ProductImage>(
            "SELECT * FROM product_images WHERE product_id = ANY($1) ORDER BY id",
        )
        .bind(&product_ids)
        .fetch_all(&self.pool)
        .await?;

        let keys: Vec<String> = image_rows.iter().map(|r| r.img_url.clone()).collect();
        let urls = self.images.resolve_urls(&keys).await?;

        let mut urls_by_product: HashMap<i32, Vec<String>> = HashMap::new();
        for (row, url) in image_rows.iter().zip(urls) {
            urls_by_product.entry(row.product_id).or_default().push(url);
        }

        let listings = products
            .into_iter()
            .map(|product| {
                let user = owners_by_id
                    .get(&product.user_id)
                    .cloned()
                    .unwrap_or(OwnerSummary {
                        id: product.user_id,
                        username: String::new(),
                    });
                let images = urls_by_product.remove(&product.id).unwrap_or_default();
                ProductListing {
                    product,
                    user,
                    images,
                }
            })
            .collect();

        Ok(listings)
    }

    /// Apply a partial update to an already-loaded product.
    pub async fn update(&self, product: &Product, patch: ProductPatch) -> Result<Product, ApiError> {
        let updated = sqlx::query_as::<_, Product>(
            "UPDATE products SET \
                 title = COALESCE($2, title), \
                 description = COALESCE($3, description), \
                 price = COALESCE($4, price), \
                 quantity = COALESCE($5, quantity), \
                 updated_at = now() \
             WHERE id = $1 RETURNING *",
        )
        .bind(product.id)
        .bind(patch.title)
        .bind(patch.description)
        .bind(patch.price)
        .bind(patch.quantity)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Soft delete: flip status to 'deleted'. The row stays queryable for
    /// audit but disappears from the loader and active listings.
    pub async fn soft_delete(&self, product: &Product) -> Result<Product, ApiError> {
        let deleted = sqlx::query_as::<_, Product>(
            "UPDATE products SET status = 'deleted', updated_at = now() \
             WHERE id = $1 RETURNING *",
        )
        .bind(product.id)
        .fetch_one(&self.pool)
        .await?;

        Ok(deleted)
    }
}
