//! Store-level models: users and typed store errors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A registered account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    /// Bcrypt hash; never serialized to clients
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: String, name: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            name,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

/// Typed failures a store reports through `anyhow::Error`.
///
/// Callers recover them with `err.downcast_ref::<StoreError>()`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write
    #[error("{0}")]
    Conflict(String),
}

/// Whether an `anyhow` error carries a [`StoreError::Conflict`]
pub fn is_conflict(err: &anyhow::Error) -> bool {
    matches!(err.downcast_ref::<StoreError>(), Some(StoreError::Conflict(_)))
}
