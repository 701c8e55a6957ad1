//! Bearer-token gate for protected routes.
//!
//! Deny-by-default: without an `auth` section in the configuration every
//! protected request is rejected with 403.

use crate::api::handlers::{AppError, VaultState};
use crate::auth::jwt::decode_jwt;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

/// Token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Invalid Authorization header format".to_string()))
}

/// Whether `email` belongs to `domain` (case-insensitive)
pub fn email_in_domain(email: &str, domain: &str) -> bool {
    email
        .to_lowercase()
        .ends_with(&format!("@{}", domain.to_lowercase()))
}

/// Middleware that requires a valid JWT Bearer token.
///
/// 1. No `auth_config` → 403
/// 2. Missing or malformed header → 401
/// 3. Bad signature or expired token → 401
/// 4. Email outside `allowed_email_domain` → 403
/// 5. Otherwise the `Claims` are inserted into request extensions
pub async fn require_auth(
    State(state): State<VaultState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_config = state.auth_config.as_ref().ok_or_else(|| {
        AppError::Forbidden("Authentication not configured, access denied".to_string())
    })?;

    let token = bearer_token(req.headers())?;
    let claims = decode_jwt(token, &auth_config.jwt_secret).map_err(|e| {
        tracing::debug!("Rejected bearer token: {:#}", e);
        AppError::Unauthorized("Invalid or expired token".to_string())
    })?;

    if let Some(ref domain) = auth_config.allowed_email_domain {
        if !email_in_domain(&claims.email, domain) {
            return Err(AppError::Forbidden(format!(
                "Email domain not allowed (expected @{})",
                domain
            )));
        }
    }

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
