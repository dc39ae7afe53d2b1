use sqlx::PgPool;

use crate::error::ApiError;
use crate::models::Category;

pub struct CategoryService {
    pool: PgPool,
}

impl CategoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, name: &str) -> Result<Category, ApiError> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name, status) VALUES ($1, 'active') RETURNING *",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    pub async fn list_active(&self) -> Result<Vec<Category>, ApiError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE status = 'active' ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Rename an already-loaded category. No ownership check: any
    /// authenticated user may rename any category.
    pub async fn rename(&self, category: &Category, name: &str) -> Result<Category, ApiError> {
        let renamed = sqlx::query_as::<_, Category>(
            "UPDATE categories SET name = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(category.id)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(renamed)
    }
}
