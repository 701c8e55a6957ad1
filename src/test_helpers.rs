//! Test helper factories and mock state builders
//!
//! Provides convenience functions for creating test objects with sensible defaults,
//! and helpers for building mock AppState / ServerState instances over the
//! in-memory store.
#![allow(dead_code)]

use crate::api::handlers::{ServerState, VaultState};
use crate::notes::Note;
use crate::para::{Collection, CollectionKind, Project};
use crate::store::{InMemoryStore, User};
use crate::{AppState, AuthConfig, Config, StoreBackend};
use axum::body::Body;
use axum::http::Request;
use std::sync::Arc;
use uuid::Uuid;

/// Signing secret shared by test tokens and [`test_auth_config`]
pub const TEST_SECRET: &str = "test-secret-key-minimum-32-chars!!";

// ============================================================================
// Mock state builders
// ============================================================================

fn test_config(auth_config: Option<AuthConfig>) -> Config {
    Config {
        server_port: 0,
        store_backend: StoreBackend::Memory,
        neo4j_uri: "bolt://mock:7687".to_string(),
        neo4j_user: "neo4j".to_string(),
        neo4j_password: "mock".to_string(),
        promote_reflections: true,
        auth_config,
    }
}

/// Create a mock AppState over an empty in-memory store, auth disabled
pub fn mock_app_state() -> AppState {
    AppState::with_store(Arc::new(InMemoryStore::new()), test_config(None))
}

/// Create a ServerState over an empty in-memory store
pub fn mock_server_state(auth_config: Option<AuthConfig>) -> VaultState {
    let app = AppState::with_store(Arc::new(InMemoryStore::new()), test_config(auth_config));
    Arc::new(ServerState::new(&app))
}

/// Auth config signing with [`TEST_SECRET`]; registration disabled
pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: TEST_SECRET.to_string(),
        jwt_expiry_secs: 3600,
        allowed_email_domain: None,
        allow_registration: false,
    }
}

/// `Authorization` header value for the given identity
pub fn test_bearer_token(user_id: Uuid, email: &str) -> String {
    let token = crate::auth::jwt::encode_jwt(user_id, email, "Test User", TEST_SECRET, 3600)
        .expect("test token encoding should succeed");
    format!("Bearer {}", token)
}

// ============================================================================
// HTTP helpers
// ============================================================================

/// Build a request; a `Null` body sends no body at all
pub fn json_request(
    method: &str,
    uri: &str,
    authorization: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = authorization {
        builder = builder.header("authorization", value);
    }
    let body = if body.is_null() {
        Body::empty()
    } else {
        builder = builder.header("content-type", "application/json");
        Body::from(body.to_string())
    };
    builder.body(body).expect("valid test request")
}

/// Read a response body as JSON; non-JSON bodies come back as a string value
pub async fn response_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("readable body");
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned()))
}

// ============================================================================
// Entity factories
// ============================================================================

pub fn test_user(email: &str) -> User {
    User::new(email.to_string(), "Test User".to_string(), String::new())
}

pub fn test_note(user_id: Uuid, title: &str) -> Note {
    Note::new(user_id, title.to_string(), format!("Content of {}", title))
}

pub fn test_project(user_id: Uuid, name: &str) -> Project {
    Project::new(user_id, name.to_string(), None)
}

pub fn test_area(user_id: Uuid, name: &str) -> Collection {
    Collection::new(user_id, CollectionKind::Area, name.to_string(), None)
}

pub fn test_resource(user_id: Uuid, name: &str) -> Collection {
    Collection::new(user_id, CollectionKind::Resource, name.to_string(), None)
}
