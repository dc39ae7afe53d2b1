use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::response::{ApiResponse, ApiResult};
use crate::services::AuthService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /login - authenticate credentials, return the user (password already
/// stripped by serialization) and a fresh session token.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Value> {
    let service = AuthService::new(state.pool.clone());
    let (user, token) = service
        .login(&state.config.security, &payload.email, &payload.password)
        .await?;

    Ok(ApiResponse::success(json!({
        "user": user,
        "token": token,
    })))
}
