use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::services::image_store::ImageStore;

/// Shared application state handed to handlers and middleware via axum State.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
    pub images: Arc<dyn ImageStore>,
}
