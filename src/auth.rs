use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::SecurityConfig;
use crate::error::ApiError;

/// JWT payload for a session: the user id plus standard expiry/issue stamps.
/// Stateless - there is no server-side revocation list.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub id: i32,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: i32, security: &SecurityConfig) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::days(security.jwt_expiry_days)).timestamp();

        Self {
            id: user_id,
            exp,
            iat: now.timestamp(),
        }
    }
}

/// Issue a signed session token embedding the user id.
pub fn sign_session(user_id: i32, security: &SecurityConfig) -> Result<String, ApiError> {
    if security.jwt_secret.is_empty() {
        return Err(ApiError::internal("JWT secret not configured"));
    }

    let claims = Claims::new(user_id, security);
    let encoding_key = EncodingKey::from_secret(security.jwt_secret.as_bytes());

    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| ApiError::internal(format!("Failed to sign session token: {}", e)))
}

/// Verify a session token's signature and expiry and return its claims.
pub fn verify_session(token: &str, security: &SecurityConfig) -> Result<Claims, ApiError> {
    if security.jwt_secret.is_empty() {
        return Err(ApiError::unauthorized("JWT secret not configured"));
    }

    let decoding_key = DecodingKey::from_secret(security.jwt_secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| ApiError::unauthorized(format!("Invalid session token: {}", e)))?;

    Ok(token_data.claims)
}

/// Ownership capability check: only the creator of a product may mutate it.
/// Pure so the rule is independent of the HTTP layer.
pub fn verify_ownership(requester_id: i32, owner_id: i32) -> Result<(), ApiError> {
    if requester_id == owner_id {
        Ok(())
    } else {
        Err(ApiError::NotOwner)
    }
}
