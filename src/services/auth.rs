use sqlx::PgPool;

use crate::auth;
use crate::config::SecurityConfig;
use crate::error::ApiError;
use crate::models::User;

pub struct AuthService {
    pool: PgPool,
}

impl AuthService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Authenticate email/password credentials and issue a session token.
    ///
    /// Unknown email and wrong password both produce the identical
    /// "Wrong credentials" 400 so the response never reveals which one it was.
    pub async fn login(
        &self,
        security: &SecurityConfig,
        email: &str,
        password: &str,
    ) -> Result<(User, String), ApiError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE email = $1 AND status = 'active'",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        let Some(user) = user else {
            return Err(ApiError::bad_request("Wrong credentials"));
        };

        if !bcrypt::verify(password, &user.password)? {
            return Err(ApiError::bad_request("Wrong credentials"));
        }

        let token = auth::sign_session(user.id, security)?;
        Ok((user, token))
    }
}
