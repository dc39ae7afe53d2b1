use axum::{
    extract::{Extension, Multipart, State},
    Json,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};

use crate::auth;
use crate::error::ApiError;
use crate::middleware::{LoadedProduct, SessionUser};
use crate::response::{ApiResponse, ApiResult};
use crate::services::image_store::UploadedImage;
use crate::services::{NewProduct, ProductPatch, ProductService};
use crate::state::AppState;

/// Upload cap for the "productImg" multipart field, enforced before the
/// service runs.
pub const MAX_PRODUCT_IMAGES: usize = 5;

fn product_service(state: &AppState) -> ProductService {
    ProductService::new(state.pool.clone(), state.images.clone())
}

/// GET /products - all active products with owner usernames and image URLs.
pub async fn list_products(State(state): State<AppState>) -> ApiResult<Value> {
    let products = product_service(&state).list_active().await?;
    Ok(ApiResponse::success(json!({ "products": products })))
}

/// GET /products/:id - the loader has already fetched the active product.
pub async fn get_product(
    Extension(LoadedProduct(product)): Extension<LoadedProduct>,
) -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({ "product": product })))
}

/// POST /products - multipart create: text fields plus up to 5 "productImg"
/// files, handed to the image store after the row is created.
pub async fn create_product(
    State(state): State<AppState>,
    Extension(SessionUser(user)): Extension<SessionUser>,
    mut multipart: Multipart,
) -> ApiResult<Value> {
    let mut draft = ProductDraft::default();
    let mut files: Vec<UploadedImage> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "productImg" => {
                check_image_cap(files.len())?;
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    ApiError::validation(format!("Failed to read uploaded file: {}", e))
                })?;
                files.push(UploadedImage {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            "title" => draft.title = Some(read_text(field).await?),
            "description" => draft.description = Some(read_text(field).await?),
            "price" => draft.price = Some(read_text(field).await?),
            "categoryId" => draft.category_id = Some(read_text(field).await?),
            "quantity" => draft.quantity = Some(read_text(field).await?),
            _ => {} // unknown fields are ignored
        }
    }

    let fields = draft.validate()?;
    let product = product_service(&state).create(&user, fields, files).await?;

    Ok(ApiResponse::created(json!({ "newProduct": product })))
}

/// PATCH /products/:id - partial update, owner only.
pub async fn update_product(
    State(state): State<AppState>,
    Extension(SessionUser(user)): Extension<SessionUser>,
    Extension(LoadedProduct(product)): Extension<LoadedProduct>,
    Json(patch): Json<ProductPatch>,
) -> ApiResult<Value> {
    auth::verify_ownership(user.id, product.user_id)?;

    let product = product_service(&state).update(&product, patch).await?;
    Ok(ApiResponse::success(json!({ "product": product })))
}

/// DELETE /products/:id - soft delete, owner only.
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(SessionUser(user)): Extension<SessionUser>,
    Extension(LoadedProduct(product)): Extension<LoadedProduct>,
) -> ApiResult<Value> {
    auth::verify_ownership(user.id, product.user_id)?;

    let product = product_service(&state).soft_delete(&product).await?;
    Ok(ApiResponse::success(json!({ "product": product })))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::validation(format!("Malformed multipart field: {}", e)))
}

fn check_image_cap(current: usize) -> Result<(), ApiError> {
    if current >= MAX_PRODUCT_IMAGES {
        return Err(ApiError::validation(format!(
            "At most {} product images are allowed",
            MAX_PRODUCT_IMAGES
        )));
    }
    Ok(())
}

/// Accumulated text fields from the multipart body, validated into a
/// `NewProduct` once the stream is drained.
#[derive(Debug, Default)]
struct ProductDraft {
    title: Option<String>,
    description: Option<String>,
    price: Option<String>,
    category_id: Option<String>,
    quantity: Option<String>,
}

impl ProductDraft {
    fn validate(self) -> Result<NewProduct, ApiError> {
        let mut missing = Vec::new();
        if self.title.as_deref().map_or(true, str::is_empty) {
            missing.push("title");
        }
        if self.description.as_deref().map_or(true, str::is_empty) {
            missing.push("description");
        }
        if self.price.as_deref().map_or(true, str::is_empty) {
            missing.push("price");
        }
        if self.category_id.as_deref().map_or(true, str::is_empty) {
            missing.push("categoryId");
        }
        if self.quantity.as_deref().map_or(true, str::is_empty) {
            missing.push("quantity");
        }
        if !missing.is_empty() {
            return Err(ApiError::validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        let price: Decimal = self
            .price
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(|_| ApiError::validation("price must be a decimal number"))?;
        let category_id: i32 = self
            .category_id
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(|_| ApiError::validation("categoryId must be an integer"))?;
        let quantity: i32 = self
            .quantity
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(|_| ApiError::validation("quantity must be an integer"))?;

        Ok(NewProduct {
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            price,
            category_id,
            quantity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_draft() -> ProductDraft {
        ProductDraft {
            title: Some("Mechanical keyboard".to_string()),
            description: Some("Tenkeyless, brown switches".to_string()),
            price: Some("79.99".to_string()),
            category_id: Some("2".to_string()),
            quantity: Some("10".to_string()),
        }
    }

    #[test]
    fn test_valid_draft_passes() {
        let fields = full_draft().validate().unwrap();
        assert_eq!(fields.title, "Mechanical keyboard");
        assert_eq!(fields.price, "79.99".parse::<Decimal>().unwrap());
        assert_eq!(fields.category_id, 2);
        assert_eq!(fields.quantity, 10);
    }

    #[test]
    fn test_missing_fields_reported_together() {
        let draft = ProductDraft {
            title: Some("x".to_string()),
            ..Default::default()
        };
        let err = draft.validate().unwrap_err();
        assert_eq!(err.status_code(), 400);
        let msg = err.message().to_string();
        assert!(msg.contains("description"));
        assert!(msg.contains("price"));
        assert!(msg.contains("categoryId"));
        assert!(msg.contains("quantity"));
        assert!(!msg.contains("title"));
    }

    #[test]
    fn test_empty_string_counts_as_missing() {
        let mut draft = full_draft();
        draft.title = Some(String::new());
        let err = draft.validate().unwrap_err();
        assert!(err.message().contains("title"));
    }

    #[test]
    fn test_non_numeric_price_rejected() {
        let mut draft = full_draft();
        draft.price = Some("cheap".to_string());
        let err = draft.validate().unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.message().contains("price"));
    }

    #[test]
    fn test_image_cap_allows_five() {
        for count in 0..MAX_PRODUCT_IMAGES {
            assert!(check_image_cap(count).is_ok());
        }
    }

    #[test]
    fn test_sixth_image_rejected() {
        let err = check_image_cap(MAX_PRODUCT_IMAGES).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.message().contains("5"));
    }
}
