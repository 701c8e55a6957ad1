//! API route definitions

use super::handlers::{self, VaultState};
use super::{auth_handlers, note_handlers, para_handlers, prompt_handlers};
use crate::auth::middleware::require_auth;
use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the API router.
///
/// Public routes: `/health`, `/auth/register`, `/auth/login`.
/// Everything else sits behind [`require_auth`].
pub fn create_router(state: VaultState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let public = Router::new()
        .route("/health", get(handlers::health))
        .route("/auth/register", post(auth_handlers::register))
        .route("/auth/login", post(auth_handlers::login));

    let protected = Router::new()
        .route("/auth/me", get(auth_handlers::get_me))
        // ====================================================================
        // Areas
        // ====================================================================
        .route(
            "/api/areas",
            get(para_handlers::list_areas).post(para_handlers::create_area),
        )
        .route(
            "/api/areas/{id}",
            get(para_handlers::get_area)
                .patch(para_handlers::update_area)
                .delete(para_handlers::delete_area),
        )
        // ====================================================================
        // Resources
        // ====================================================================
        .route(
            "/api/resources",
            get(para_handlers::list_resources).post(para_handlers::create_resource),
        )
        .route(
            "/api/resources/{id}",
            get(para_handlers::get_resource)
                .patch(para_handlers::update_resource)
                .delete(para_handlers::delete_resource),
        )
        // ====================================================================
        // Projects
        // ====================================================================
        .route(
            "/api/projects",
            get(para_handlers::list_projects).post(para_handlers::create_project),
        )
        .route(
            "/api/projects/{id}",
            get(para_handlers::get_project)
                .patch(para_handlers::update_project)
                .delete(para_handlers::delete_project),
        )
        // ====================================================================
        // Notes & connections
        // ====================================================================
        .route(
            "/api/notes",
            get(note_handlers::list_notes).post(note_handlers::create_note),
        )
        .route(
            "/api/notes/{id}",
            get(note_handlers::get_note)
                .patch(note_handlers::update_note)
                .delete(note_handlers::delete_note),
        )
        .route("/api/connections", post(note_handlers::create_connection))
        .route(
            "/api/connections/{id}",
            axum::routing::delete(note_handlers::delete_connection),
        )
        .route("/api/review", get(note_handlers::review))
        // ====================================================================
        // Daily prompts
        // ====================================================================
        .route(
            "/api/daily-prompts",
            get(prompt_handlers::get_daily_prompt).post(prompt_handlers::record_response),
        )
        .route(
            "/api/daily-prompts/history",
            get(prompt_handlers::prompt_history),
        )
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    public
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
