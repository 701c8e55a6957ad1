//! HS256 bearer tokens.
//!
//! A token names one vault user (`sub`) and expires after
//! `auth.jwt_expiry_secs`. Every protected route reads it from the
//! `Authorization: Bearer` header.

use crate::store::User;
use crate::AuthConfig;
use anyhow::{Context, Result};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject: user UUID
    pub sub: String,
    pub email: String,
    pub name: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// The user id carried in `sub`, if it is a UUID
    pub fn user_id(&self) -> Option<Uuid> {
        self.sub.parse().ok()
    }
}

/// Encode a signed token for the given identity.
pub fn encode_jwt(
    user_id: Uuid,
    email: &str,
    name: &str,
    secret: &str,
    expiry_secs: u64,
) -> Result<String> {
    let iat = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        name: name.to_string(),
        iat,
        exp: iat + expiry_secs as i64,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("Failed to encode JWT")
}

/// Issue a token for a stored user under the configured secret and lifetime
pub fn issue_token(user: &User, config: &AuthConfig) -> Result<String> {
    encode_jwt(
        user.id,
        &user.email,
        &user.name,
        &config.jwt_secret,
        config.jwt_expiry_secs,
    )
}

/// Verify signature and expiry, returning the claims.
pub fn decode_jwt(token: &str, secret: &str) -> Result<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .context("Failed to decode JWT")
}
