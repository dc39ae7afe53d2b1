use axum::{
    extract::{Extension, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::LoadedCategory;
use crate::response::{ApiResponse, ApiResult};
use crate::services::CategoryService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
}

fn validated_name(payload: &CategoryRequest) -> Result<&str, ApiError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::validation("name is required"));
    }
    Ok(name)
}

/// GET /products/categories - all active categories.
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Value> {
    let categories = CategoryService::new(state.pool.clone()).list_active().await?;
    Ok(ApiResponse::success(json!({ "categories": categories })))
}

/// POST /products/categories - any authenticated user may create one.
pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CategoryRequest>,
) -> ApiResult<Value> {
    let name = validated_name(&payload)?;
    let category = CategoryService::new(state.pool.clone()).create(name).await?;
    Ok(ApiResponse::created(json!({ "newCategory": category })))
}

/// PATCH /products/categories/:id - rename; existence is the only guard.
pub async fn update_category(
    State(state): State<AppState>,
    Extension(LoadedCategory(category)): Extension<LoadedCategory>,
    Json(payload): Json<CategoryRequest>,
) -> ApiResult<Value> {
    let name = validated_name(&payload)?;
    let category = CategoryService::new(state.pool.clone())
        .rename(&category, name)
        .await?;
    Ok(ApiResponse::success(json!({ "category": category })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_rejected() {
        let payload = CategoryRequest {
            name: "   ".to_string(),
        };
        let err = validated_name(&payload).unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_name_is_trimmed() {
        let payload = CategoryRequest {
            name: "  Electronics  ".to_string(),
        };
        assert_eq!(validated_name(&payload).unwrap(), "Electronics");
    }
}
