//! Password hashing, token issuance and the bearer-token extractor.
//!
//! Passwords are stored as Argon2id PHC strings. Tokens are HS256 JWTs signed
//! with the secret from [`JwtConfig`]; nothing here reads the environment.

use crate::config::JwtConfig;
use crate::errors::AppError;
use crate::state::AppState;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AppError::Internal(err.to_string()))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash).map_err(|err| AppError::Internal(err.to_string()))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(err) => Err(AppError::Internal(err.to_string())),
    }
}

pub fn issue_token(user_id: Uuid, email: &str, config: &JwtConfig) -> Result<String, AppError> {
    let now = chrono::Utc::now().timestamp();
    let exp = config
        .ttl_hours
        .checked_mul(3600)
        .and_then(|ttl| now.checked_add(ttl))
        .ok_or_else(|| AppError::Internal("token lifetime overflows".into()))?;
    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        iat: now,
        exp,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|err| AppError::Internal(err.to_string()))
}

pub fn verify_token(token: &str, config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("invalid or expired token".into()))
}

/// Caller resolved from `Authorization: Bearer <token>`.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("missing authorization header".into()))?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("expected a bearer token".into()))?;

        let claims = verify_token(token.trim(), &state.jwt)?;
        Ok(Self { user_id: claims.sub })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            ttl_hours: 24,
        }
    }

    #[test]
    fn password_round_trip() {
        let hash = hash_password("correct-horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct-horse", &hash).unwrap());
        assert!(!verify_password("wrong-horse", &hash).unwrap());
    }

    #[test]
    fn token_carries_user_and_rejects_other_secret() {
        let user = Uuid::new_v4();
        let token = issue_token(user, "a@b.c", &config("alpha")).unwrap();

        let claims = verify_token(&token, &config("alpha")).unwrap();
        assert_eq!(claims.sub, user);
        assert_eq!(claims.email, "a@b.c");
        assert!(claims.exp > claims.iat);

        let err = verify_token(&token, &config("bravo")).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let expired = JwtConfig {
            secret: "alpha".into(),
            ttl_hours: -1,
        };
        let token = issue_token(Uuid::new_v4(), "a@b.c", &expired).unwrap();
        assert!(verify_token(&token, &config("alpha")).is_err());
    }

    #[test]
    fn oversized_lifetime_is_an_error() {
        let huge = JwtConfig {
            secret: "alpha".into(),
            ttl_hours: i64::MAX,
        };
        let err = issue_token(Uuid::new_v4(), "a@b.c", &huge).unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
