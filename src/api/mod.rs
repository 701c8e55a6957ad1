//! HTTP API for the vault

pub mod auth_handlers;
pub mod extract;
pub mod handlers;
pub mod note_handlers;
pub mod para_handlers;
pub mod prompt_handlers;
pub mod query;
pub mod routes;

pub use handlers::{AppError, ServerState, VaultState};
pub use routes::create_router;
