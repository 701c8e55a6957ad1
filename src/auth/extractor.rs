//! AuthUser extractor for Axum handlers.
//!
//! Reads the claims placed in request extensions by `require_auth`.

use crate::api::handlers::{AppError, VaultState};
use crate::auth::jwt::Claims;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

/// Identity of the caller, taken from a verified token.
///
/// Every handler that touches user data takes this as a parameter and passes
/// `user_id` down to the managers:
///
/// ```rust,ignore
/// async fn list_notes(State(state): State<VaultState>, user: AuthUser) -> ... {
///     state.notes.list_notes(user.user_id, &filters).await
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
}

impl AuthUser {
    fn from_claims(claims: &Claims) -> Result<Self, AppError> {
        let user_id = claims
            .user_id()
            .ok_or_else(|| AppError::Unauthorized("Invalid user ID in token".to_string()))?;

        Ok(Self {
            user_id,
            email: claims.email.clone(),
            name: claims.name.clone(),
        })
    }
}

impl FromRequestParts<VaultState> for AuthUser {
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &VaultState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        async {
            let claims = parts
                .extensions
                .get::<Claims>()
                .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

            Self::from_claims(claims)
        }
    }
}
