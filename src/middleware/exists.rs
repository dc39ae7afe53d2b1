use axum::{
    extract::{Path, Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::models::{Category, Product};
use crate::state::AppState;

/// Product loaded by `product_exists`, available to downstream stages.
#[derive(Clone, Debug)]
pub struct LoadedProduct(pub Product);

/// Category loaded by `category_exists`.
#[derive(Clone, Debug)]
pub struct LoadedCategory(pub Category);

/// Resource loader for `/products/:id` routes. Fetches the active product and
/// short-circuits with 404 before any later stage runs; soft-deleted rows are
/// invisible here. Shared by get, update and delete so visibility stays
/// consistent across the three.
pub async fn product_exists(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let product = sqlx::query_as::<_, Product>(
        "SELECT * FROM products WHERE id = $1 AND status = 'active'",
    )
    .bind(id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Product not found"))?;

    request.extensions_mut().insert(LoadedProduct(product));
    Ok(next.run(request).await)
}

/// Resource loader for `/products/categories/:id` routes.
pub async fn category_exists(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let category = sqlx::query_as::<_, Category>(
        "SELECT * FROM categories WHERE id = $1 AND status = 'active'",
    )
    .bind(id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Category not found"))?;

    request.extensions_mut().insert(LoadedCategory(category));
    Ok(next.run(request).await)
}
