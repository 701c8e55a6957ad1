//! Shared server state, error mapping and the health check

use crate::error::VaultError;
use crate::notes::NoteManager;
use crate::para::ParaManager;
use crate::prompts::PromptManager;
use crate::store::VaultStore;
use crate::{AppState, AuthConfig};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;

/// Shared server state
pub struct ServerState {
    pub store: Arc<dyn VaultStore>,
    pub notes: Arc<NoteManager>,
    pub para: Arc<ParaManager>,
    pub prompts: Arc<PromptManager>,
    /// Auth config; None means deny-by-default
    pub auth_config: Option<AuthConfig>,
}

pub type VaultState = Arc<ServerState>;

impl ServerState {
    /// Build managers over the application's store
    pub fn new(app: &AppState) -> Self {
        let store = app.store.clone();
        Self {
            notes: Arc::new(NoteManager::new(store.clone())),
            para: Arc::new(ParaManager::new(store.clone())),
            prompts: Arc::new(PromptManager::new(
                store.clone(),
                app.config.promote_reflections,
            )),
            auth_config: app.config.auth_config.clone(),
            store,
        }
    }
}

/// Body of successful deletes
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub store: String,
}

/// Health check handler, verifies store connectivity.
///
/// Returns 200 + `"ok"` when the store answers, 503 + `"unhealthy"` otherwise.
pub async fn health(State(state): State<VaultState>) -> (StatusCode, Json<HealthResponse>) {
    let store_ok = state.store.health_check().await.unwrap_or(false);

    let (http_status, status) = if store_ok {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    (
        http_status,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            store: if store_ok {
                "connected".to_string()
            } else {
                "disconnected".to_string()
            },
        }),
    )
}

// ============================================================================
// Error handling
// ============================================================================

/// Application error type
#[derive(Debug)]
pub enum AppError {
    Internal(anyhow::Error),
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    Conflict(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Internal(e) => {
                tracing::error!("Request failed: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl From<VaultError> for AppError {
    fn from(err: VaultError) -> Self {
        match err {
            VaultError::Validation(msg) => AppError::BadRequest(msg),
            VaultError::NotFound(msg) => AppError::NotFound(msg),
            VaultError::Conflict(msg) => AppError::Conflict(msg),
            VaultError::Store(e) => AppError::Internal(e),
        }
    }
}
