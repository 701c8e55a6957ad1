//! Authentication route handlers: password registration, login, user info.
//!
//! Endpoints:
//! - `POST /auth/register`: Create an account and return a token (public)
//! - `POST /auth/login`:    Email/password login (public)
//! - `GET  /auth/me`:       The authenticated user (protected)

use crate::api::extract::ApiJson;
use crate::api::handlers::{AppError, VaultState};
use crate::auth::extractor::AuthUser;
use crate::auth::jwt::issue_token;
use crate::auth::middleware::email_in_domain;
use crate::error::VaultError;
use crate::store::User;
use crate::AuthConfig;
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Bcrypt work factor for stored password hashes
const BCRYPT_COST: u32 = 12;

/// Minimum accepted password length
const MIN_PASSWORD_LEN: usize = 8;

// ============================================================================
// Request / Response types
// ============================================================================

/// Request body for POST /auth/login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for POST /auth/register
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Response for register and login
#[derive(Serialize)]
pub struct AuthTokenResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Public view of a user
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            created_at: user.created_at,
        }
    }
}

fn require_auth_config(state: &VaultState) -> Result<&AuthConfig, AppError> {
    state
        .auth_config
        .as_ref()
        .ok_or_else(|| AppError::Forbidden("Authentication not configured".to_string()))
}

fn token_response(user: User, auth_config: &AuthConfig) -> Result<Json<AuthTokenResponse>, AppError> {
    let token = issue_token(&user, auth_config).map_err(AppError::Internal)?;
    Ok(Json(AuthTokenResponse {
        token,
        user: UserResponse::from(user),
    }))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/register: Create a password account and log it in.
///
/// 403 when registration is disabled or the email domain is not allowed,
/// 400 on invalid input, 409 when the email is taken.
pub async fn register(
    State(state): State<VaultState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<Json<AuthTokenResponse>, AppError> {
    let auth_config = require_auth_config(&state)?;

    if !auth_config.allow_registration {
        return Err(AppError::Forbidden("Registration is disabled".to_string()));
    }

    validate_registration(&req, auth_config)?;

    let email = req.email.trim().to_string();
    if state.store.get_user_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict(
            "An account with this email already exists".to_string(),
        ));
    }

    let password_hash = bcrypt::hash(&req.password, BCRYPT_COST)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to hash password: {}", e)))?;

    let user = User::new(email, req.name.trim().to_string(), password_hash);
    // A concurrent registration of the same email surfaces as a store conflict
    state
        .store
        .create_user(&user)
        .await
        .map_err(VaultError::from_store)?;

    tracing::info!(user_id = %user.id, "User registered");
    token_response(user, auth_config)
}

/// POST /auth/login: Email/password login.
///
/// Unknown email and wrong password produce the same 401.
pub async fn login(
    State(state): State<VaultState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<AuthTokenResponse>, AppError> {
    let auth_config = require_auth_config(&state)?;

    let invalid_credentials = || AppError::Unauthorized("Invalid email or password".to_string());

    let user = state
        .store
        .get_user_by_email(req.email.trim())
        .await?
        .ok_or_else(invalid_credentials)?;

    let password_ok = bcrypt::verify(&req.password, &user.password_hash).unwrap_or(false);
    if !password_ok {
        return Err(invalid_credentials());
    }

    if let Some(ref domain) = auth_config.allowed_email_domain {
        if !email_in_domain(&user.email, domain) {
            return Err(AppError::Forbidden(format!(
                "Email domain not allowed (expected @{})",
                domain
            )));
        }
    }

    tracing::debug!(user_id = %user.id, "User logged in");
    token_response(user, auth_config)
}

/// GET /auth/me: The authenticated user.
pub async fn get_me(
    State(state): State<VaultState>,
    user: AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let stored = state
        .store
        .get_user(user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from(stored)))
}

/// Validate a registration request.
fn validate_registration(req: &RegisterRequest, auth_config: &AuthConfig) -> Result<(), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }

    // Contains @ and a dot after it
    let email = req.email.trim();
    let valid_email = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid_email {
        return Err(AppError::BadRequest("Invalid email format".to_string()));
    }

    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    if let Some(ref domain) = auth_config.allowed_email_domain {
        if !email_in_domain(email, domain) {
            return Err(AppError::Forbidden(format!(
                "Email domain not allowed (expected @{})",
                domain
            )));
        }
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
