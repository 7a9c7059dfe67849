//! Single-owner authentication: argon2id password verification and HS256
//! bearer tokens. The ledger itself never sees credentials; routes only
//! receive the resolved owner identity.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{StatusCode, header, request::Parts};
use axum::response::Json;
use habit_ledger_types::ErrorResponse;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Bearer token lifetime.
const TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

pub struct AuthConfig {
    pub username: String,
    password_hash: String,
    secret: String,
}

impl AuthConfig {
    /// Hash the configured password up front; only the PHC hash is kept.
    pub fn new(
        username: String,
        password: &str,
        secret: String,
    ) -> Result<Self, argon2::password_hash::Error> {
        let password_hash = hash_password(password)?;
        Ok(Self {
            username,
            password_hash,
            secret,
        })
    }

    /// Exchange credentials for a signed bearer token. `None` means
    /// invalid credentials; the caller decides how to report that.
    pub fn login(&self, username: &str, password: &str) -> Option<String> {
        if username != self.username || !verify_password(password, &self.password_hash) {
            return None;
        }
        let claims = Claims {
            sub: username.to_string(),
            exp: (chrono::Utc::now().timestamp() + TOKEN_TTL_SECS) as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .ok()
    }

    /// Resolve a bearer token back to the owner identity it was issued
    /// for. `None` covers malformed, forged, and expired tokens alike.
    pub fn verify_token(&self, token: &str) -> Option<String> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims.sub)
        .ok()
    }
}

fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Owner identity resolved from the `Authorization: Bearer` header.
pub struct AuthOwner(pub String);

#[async_trait]
impl FromRequestParts<Arc<crate::routes::AppState>> for AuthOwner {
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<crate::routes::AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| unauthorized("missing bearer token"))?;

        match state.auth.verify_token(token) {
            Some(owner) => Ok(AuthOwner(owner)),
            None => Err(unauthorized("invalid or expired token")),
        }
    }
}

fn unauthorized(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}
