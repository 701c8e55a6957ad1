//! Persistence layer: the `VaultStore` trait and its Neo4j and in-memory backends

pub mod client;
mod impl_vault_store;
pub mod memory;
pub mod models;
pub mod traits;

pub use client::Neo4jClient;
pub use memory::InMemoryStore;
pub use models::{is_conflict, StoreError, User};
pub use traits::VaultStore;
