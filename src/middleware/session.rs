use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth;
use crate::error::ApiError;
use crate::models::User;
use crate::state::AppState;

/// Authenticated user resolved from the session token, injected into request
/// extensions for downstream stages.
#[derive(Clone, Debug)]
pub struct SessionUser(pub User);

/// Session validation middleware: verifies the bearer token and resolves it to
/// an active user record. A valid signature is not enough - the referenced
/// user must still exist and be active.
pub async fn protect_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&headers)?;
    let claims = auth::verify_session(&token, &state.config.security)?;

    let user = sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE id = $1 AND status = 'active'",
    )
    .bind(claims.id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| ApiError::unauthorized("The owner of this session is no longer active"))?;

    request.extensions_mut().insert(SessionUser(user));
    Ok(next.run(request).await)
}

/// Extract the bearer token from the Authorization header.
fn bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::unauthorized("Invalid Authorization header format"))?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::unauthorized("Authorization header must use Bearer token format"))?;

    if token.trim().is_empty() {
        return Err(ApiError::unauthorized("Empty session token"));
    }

    Ok(token.to_string())
}
