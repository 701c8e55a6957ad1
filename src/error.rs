//! Domain error taxonomy shared by the vault managers.
//!
//! Store methods return `anyhow::Result`; managers translate store failures
//! into [`VaultError`] so handlers can map each variant to a status code.

use crate::store::is_conflict;
use thiserror::Error;

/// Failure of a vault operation.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Missing or malformed input (blank name, two PARA parents, ...)
    #[error("{0}")]
    Validation(String),
    /// Entity absent or owned by another user
    #[error("{0}")]
    NotFound(String),
    /// Uniqueness violation (duplicate connection pair, taken email)
    #[error("{0}")]
    Conflict(String),
    /// Persistence or other unexpected failure
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl VaultError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Convert a store error, surfacing `StoreError::Conflict` as [`VaultError::Conflict`]
    pub fn from_store(err: anyhow::Error) -> Self {
        if is_conflict(&err) {
            Self::Conflict(err.to_string())
        } else {
            Self::Store(err)
        }
    }
}

pub type VaultResult<T> = Result<T, VaultError>;

/// Require a non-blank value, returning it trimmed.
pub fn required_trimmed(value: &str, field: &str) -> VaultResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(VaultError::validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional free-text value; blank collapses to `None`.
pub fn optional_trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
