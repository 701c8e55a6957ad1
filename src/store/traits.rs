//! VaultStore trait definition
//!
//! Defines the abstract interface for all persistence operations.
//! Both the Neo4j client and the in-memory store implement it, so managers
//! and handlers never depend on a concrete backend.
//!
//! Every read and write of user-owned data takes the owner's id and uses it
//! in the lookup predicate: an entity owned by someone else is reported
//! exactly like a missing one.

use super::models::User;
use crate::notes::{Connection, Note, NoteFilters, NoteWithCounts};
use crate::para::{Collection, CollectionKind, Counted, ParaRef, Project};
use crate::prompts::DailyPrompt;
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

/// Abstract interface for all vault persistence operations.
#[async_trait]
pub trait VaultStore: Send + Sync {
    /// Check connectivity to the backing database
    async fn health_check(&self) -> Result<bool>;

    // ========================================================================
    // User operations
    // ========================================================================

    /// Create a user. Fails with `StoreError::Conflict` if the email is taken.
    async fn create_user(&self, user: &User) -> Result<()>;

    /// Get a user by ID
    async fn get_user(&self, id: Uuid) -> Result<Option<User>>;

    /// Get a user by (case-insensitive) email
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    // ========================================================================
    // Project operations
    // ========================================================================

    async fn create_project(&self, project: &Project) -> Result<()>;

    async fn get_project(&self, user_id: Uuid, id: Uuid) -> Result<Option<Project>>;

    /// List a user's projects, most recently updated first
    async fn list_projects(&self, user_id: Uuid) -> Result<Vec<Counted<Project>>>;

    /// Overwrite a project's stored fields. Returns false if not found for its owner.
    async fn update_project(&self, project: &Project) -> Result<bool>;

    /// Delete a project; its notes lose their parent and fall back to Archive
    async fn delete_project(&self, user_id: Uuid, id: Uuid) -> Result<bool>;

    // ========================================================================
    // Area / Resource operations
    // ========================================================================

    async fn create_collection(&self, collection: &Collection) -> Result<()>;

    async fn get_collection(
        &self,
        user_id: Uuid,
        kind: CollectionKind,
        id: Uuid,
    ) -> Result<Option<Collection>>;

    /// List a user's areas or resources, most recently updated first
    async fn list_collections(
        &self,
        user_id: Uuid,
        kind: CollectionKind,
    ) -> Result<Vec<Counted<Collection>>>;

    /// Overwrite a collection's stored fields. Returns false if not found for its owner.
    async fn update_collection(&self, collection: &Collection) -> Result<bool>;

    /// Delete an area or resource; its notes fall back to Archive
    async fn delete_collection(&self, user_id: Uuid, kind: CollectionKind, id: Uuid)
        -> Result<bool>;

    /// Number of the user's notes filed under a parent
    async fn count_notes_under(&self, user_id: Uuid, parent: ParaRef) -> Result<usize>;

    // ========================================================================
    // Note operations
    // ========================================================================

    async fn create_note(&self, note: &Note) -> Result<()>;

    async fn get_note(&self, user_id: Uuid, id: Uuid) -> Result<Option<Note>>;

    /// List notes matching filters, newest first, with connection counts
    async fn list_notes(&self, user_id: Uuid, filters: &NoteFilters)
        -> Result<Vec<NoteWithCounts>>;

    /// Overwrite a note's stored fields. Returns false if not found for its owner.
    async fn update_note(&self, note: &Note) -> Result<bool>;

    /// Delete a note together with every connection it takes part in
    async fn delete_note(&self, user_id: Uuid, id: Uuid) -> Result<bool>;

    // ========================================================================
    // Connection operations
    // ========================================================================

    /// Create a directed edge. Fails with `StoreError::Conflict` if the
    /// ordered (source, target) pair already exists.
    async fn create_connection(&self, connection: &Connection) -> Result<()>;

    /// Find the edge for an ordered pair
    async fn get_connection_by_pair(
        &self,
        source_note_id: Uuid,
        target_note_id: Uuid,
    ) -> Result<Option<Connection>>;

    /// Edges leaving a note, each with its target note
    async fn list_outgoing(&self, user_id: Uuid, note_id: Uuid) -> Result<Vec<(Connection, Note)>>;

    /// Edges entering a note, each with its source note
    async fn list_incoming(&self, user_id: Uuid, note_id: Uuid) -> Result<Vec<(Connection, Note)>>;

    /// Delete an edge whose source note belongs to the user
    async fn delete_connection(&self, user_id: Uuid, id: Uuid) -> Result<bool>;

    // ========================================================================
    // Daily prompt operations
    // ========================================================================

    async fn get_daily_prompt(&self, user_id: Uuid, date: NaiveDate)
        -> Result<Option<DailyPrompt>>;

    /// Insert `prompt` unless one exists for its (user, date); return the stored one
    async fn get_or_create_daily_prompt(&self, prompt: &DailyPrompt) -> Result<DailyPrompt>;

    /// Upsert keyed by (user, date): insert `prompt` as-is if absent, otherwise
    /// copy its response, mark completed and keep the stored question.
    async fn upsert_daily_response(&self, prompt: &DailyPrompt) -> Result<DailyPrompt>;

    /// A user's prompts, newest date first
    async fn list_daily_prompts(&self, user_id: Uuid, limit: Option<usize>)
        -> Result<Vec<DailyPrompt>>;
}
