//! Password hashing and bearer-token issuance.
//!
//! Passwords are bcrypt-hashed on tokio's blocking pool. Tokens are HS256
//! JWTs whose subject is the user's email.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token signing secret is not configured")]
    MissingSecret,

    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("token rejected: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// JWT claims.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// The user's email.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

pub async fn hash_password(password: String, cost: u32) -> Result<String, AuthError> {
    let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    Ok(hashed)
}

pub async fn verify_password(password: String, hash: String) -> Result<bool, AuthError> {
    let ok = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
    Ok(ok)
}

/// Sign a token for `email` valid for the configured lifetime.
pub fn issue_token(cfg: &Config, email: &str) -> Result<String, AuthError> {
    let secret = cfg.jwt_secret.as_deref().ok_or(AuthError::MissingSecret)?;
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: email.to_owned(),
        iat: now,
        exp: now + cfg.token_ttl_secs,
    };
    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

/// Check signature and expiry of `token` and return its claims.
pub fn verify_token(cfg: &Config, token: &str) -> Result<Claims, AuthError> {
    let secret = cfg.jwt_secret.as_deref().ok_or(AuthError::MissingSecret)?;
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}
