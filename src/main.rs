use std::sync::Arc;

use axum::{
    extract::State,
    middleware::from_fn_with_state,
    routing::{get, patch, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use market_api::config::AppConfig;
use market_api::db;
use market_api::handlers;
use market_api::middleware::{exists, session};
use market_api::services::image_store::{HttpImageStore, ImageStore};
use market_api::state::AppState;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = Arc::new(AppConfig::from_env());
    if config.security.jwt_secret.is_empty() {
        tracing::warn!("JWT_SECRET is not set; every session will be rejected");
    }

    let pool = db::connect_lazy(&config.database)
        .unwrap_or_else(|e| panic!("invalid DATABASE_URL: {}", e));
    let images: Arc<dyn ImageStore> = Arc::new(
        HttpImageStore::new(&config.image_store)
            .unwrap_or_else(|e| panic!("failed to build image store client: {}", e)),
    );

    let state = AppState {
        pool,
        config: config.clone(),
        images,
    };
    let app = app(state);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("market-api listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .route("/login", post(handlers::auth::login))
        // Session-protected product and category API
        .merge(product_routes(state.clone()))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Everything under /products requires a valid session. Path-parameterized
/// routes additionally run the matching resource loader before the handler,
/// so handlers only ever see records that exist and are active.
fn product_routes(state: AppState) -> Router<AppState> {
    use handlers::{categories, products};

    let product_by_id = Router::new()
        .route(
            "/products/:id",
            get(products::get_product)
                .patch(products::update_product)
                .delete(products::delete_product),
        )
        .route_layer(from_fn_with_state(state.clone(), exists::product_exists));

    let category_by_id = Router::new()
        .route(
            "/products/categories/:id",
            patch(categories::update_category),
        )
        .route_layer(from_fn_with_state(state.clone(), exists::category_exists));

    Router::new()
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .merge(product_by_id)
        .merge(category_by_id)
        // Applied last so the session check wraps the loaders and handlers
        .route_layer(from_fn_with_state(state, session::protect_session))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "status": "success",
        "data": {
            "name": "Market API",
            "version": version,
            "description": "Marketplace products API built with Rust (Axum)",
            "endpoints": {
                "login": "POST /login (public)",
                "products": "GET|POST /products, GET|PATCH|DELETE /products/:id (session)",
                "categories": "GET|POST /products/categories, PATCH /products/categories/:id (session)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match db::health_check(&state.pool).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "success",
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "status": "error",
                "message": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
