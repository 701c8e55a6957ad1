//! `VaultStore` implementation for `Neo4jClient`.
//!
//! Every method simply delegates to the corresponding inherent method on `Neo4jClient`.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use super::client::Neo4jClient;
use super::models::User;
use super::traits::VaultStore;
use crate::notes::{Connection, Note, NoteFilters, NoteWithCounts};
use crate::para::{Collection, CollectionKind, Counted, ParaRef, Project};
use crate::prompts::DailyPrompt;

#[async_trait]
impl VaultStore for Neo4jClient {
    async fn health_check(&self) -> anyhow::Result<bool> {
        self.health_check().await
    }

    // ========================================================================
    // User operations
    // ========================================================================

    async fn create_user(&self, user: &User) -> anyhow::Result<()> {
        self.create_user(user).await
    }

    async fn get_user(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        self.get_user(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        self.get_user_by_email(email).await
    }

    // ========================================================================
    // Project operations
    // ========================================================================

    async fn create_project(&self, project: &Project) -> anyhow::Result<()> {
        self.create_project(project).await
    }

    async fn get_project(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<Project>> {
        self.get_project(user_id, id).await
    }

    async fn list_projects(&self, user_id: Uuid) -> anyhow::Result<Vec<Counted<Project>>> {
        self.list_projects(user_id).await
    }

    async fn update_project(&self, project: &Project) -> anyhow::Result<bool> {
        self.update_project(project).await
    }

    async fn delete_project(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        self.delete_project(user_id, id).await
    }

    // ========================================================================
    // Area / Resource operations
    // ========================================================================

    async fn create_collection(&self, collection: &Collection) -> anyhow::Result<()> {
        self.create_collection(collection).await
    }

    async fn get_collection(
        &self,
        user_id: Uuid,
        kind: CollectionKind,
        id: Uuid,
    ) -> anyhow::Result<Option<Collection>> {
        self.get_collection(user_id, kind, id).await
    }

    async fn list_collections(
        &self,
        user_id: Uuid,
        kind: CollectionKind,
    ) -> anyhow::Result<Vec<Counted<Collection>>> {
        self.list_collections(user_id, kind).await
    }

    async fn update_collection(&self, collection: &Collection) -> anyhow::Result<bool> {
        self.update_collection(collection).await
    }

    async fn delete_collection(
        &self,
        user_id: Uuid,
        kind: CollectionKind,
        id: Uuid,
    ) -> anyhow::Result<bool> {
        self.delete_collection(user_id, kind, id).await
    }

    async fn count_notes_under(&self, user_id: Uuid, parent: ParaRef) -> anyhow::Result<usize> {
        self.count_notes_under(user_id, parent).await
    }

    // ========================================================================
    // Note operations
    // ========================================================================

    async fn create_note(&self, note: &Note) -> anyhow::Result<()> {
        self.create_note(note).await
    }

    async fn get_note(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<Note>> {
        self.get_note(user_id, id).await
    }

    async fn list_notes(
        &self,
        user_id: Uuid,
        filters: &NoteFilters,
    ) -> anyhow::Result<Vec<NoteWithCounts>> {
        self.list_notes(user_id, filters).await
    }

    async fn update_note(&self, note: &Note) -> anyhow::Result<bool> {
        self.update_note(note).await
    }

    async fn delete_note(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        self.delete_note(user_id, id).await
    }

    // ========================================================================
    // Connection operations
    // ========================================================================

    async fn create_connection(&self, connection: &Connection) -> anyhow::Result<()> {
        self.create_connection(connection).await
    }

    async fn get_connection_by_pair(
        &self,
        source_note_id: Uuid,
        target_note_id: Uuid,
    ) -> anyhow::Result<Option<Connection>> {
        self.get_connection_by_pair(source_note_id, target_note_id)
            .await
    }

    async fn list_outgoing(
        &self,
        user_id: Uuid,
        note_id: Uuid,
    ) -> anyhow::Result<Vec<(Connection, Note)>> {
        self.list_outgoing(user_id, note_id).await
    }

    async fn list_incoming(
        &self,
        user_id: Uuid,
        note_id: Uuid,
    ) -> anyhow::Result<Vec<(Connection, Note)>> {
        self.list_incoming(user_id, note_id).await
    }

    async fn delete_connection(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        self.delete_connection(user_id, id).await
    }

    // ========================================================================
    // Daily prompt operations
    // ========================================================================

    async fn get_daily_prompt(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> anyhow::Result<Option<DailyPrompt>> {
        self.get_daily_prompt(user_id, date).await
    }

    async fn get_or_create_daily_prompt(
        &self,
        prompt: &DailyPrompt,
    ) -> anyhow::Result<DailyPrompt> {
        self.get_or_create_daily_prompt(prompt).await
    }

    async fn upsert_daily_response(&self, prompt: &DailyPrompt) -> anyhow::Result<DailyPrompt> {
        self.upsert_daily_response(prompt).await
    }

    async fn list_daily_prompts(
        &self,
        user_id: Uuid,
        limit: Option<usize>,
    ) -> anyhow::Result<Vec<DailyPrompt>> {
        self.list_daily_prompts(user_id, limit).await
    }
}
