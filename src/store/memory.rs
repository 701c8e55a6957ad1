//! In-memory implementation of VaultStore.
//!
//! Backs the test suite and `store.backend: memory` development runs.
//! Every collection is a `tokio::sync::RwLock<HashMap<K, V>>`. Locks are
//! always taken in declaration order (users, projects, collections, notes,
//! connections, prompts) so multi-table writes cannot deadlock.

use super::models::{StoreError, User};
use super::traits::VaultStore;
use crate::notes::{Connection, ConnectionCounts, Note, NoteFilters, NoteWithCounts};
use crate::para::{Collection, CollectionKind, Counted, ParaRef, Project};
use crate::prompts::DailyPrompt;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory VaultStore.
#[derive(Default)]
pub struct InMemoryStore {
    pub users: RwLock<HashMap<Uuid, User>>,
    pub projects: RwLock<HashMap<Uuid, Project>>,
    pub collections: RwLock<HashMap<Uuid, Collection>>,
    pub notes: RwLock<HashMap<Uuid, Note>>,
    pub connections: RwLock<HashMap<Uuid, Connection>>,
    /// Keyed by `DailyPrompt::day_key`
    pub daily_prompts: RwLock<HashMap<String, DailyPrompt>>,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a note (test helper)
    #[cfg(test)]
    pub async fn with_note(self, note: Note) -> Self {
        self.notes.write().await.insert(note.id, note);
        self
    }

    fn counts_for(note_id: Uuid, connections: &HashMap<Uuid, Connection>) -> ConnectionCounts {
        let mut counts = ConnectionCounts::default();
        for c in connections.values() {
            if c.source_note_id == note_id {
                counts.as_source += 1;
            }
            if c.target_note_id == note_id {
                counts.as_target += 1;
            }
        }
        counts
    }

    fn count_under(user_id: Uuid, parent: ParaRef, notes: &HashMap<Uuid, Note>) -> usize {
        notes
            .values()
            .filter(|n| n.user_id == user_id && n.parent == Some(parent))
            .count()
    }

    /// Clear the parent of every note filed under `parent`
    fn orphan_notes(user_id: Uuid, parent: ParaRef, notes: &mut HashMap<Uuid, Note>) {
        for note in notes.values_mut() {
            if note.user_id == user_id && note.parent == Some(parent) {
                note.parent = None;
            }
        }
    }

    /// Edges matching `pick`, paired with the note at the other end
    async fn edges_with_notes(
        &self,
        user_id: Uuid,
        pick: impl Fn(&Connection) -> Option<Uuid>,
    ) -> Vec<(Connection, Note)> {
        let notes = self.notes.read().await;
        let connections = self.connections.read().await;
        let mut out: Vec<(Connection, Note)> = connections
            .values()
            .filter_map(|c| {
                let other = pick(c)?;
                notes
                    .get(&other)
                    .filter(|n| n.user_id == user_id)
                    .map(|n| (c.clone(), n.clone()))
            })
            .collect();
        out.sort_by(|a, b| b.0.created_at.cmp(&a.0.created_at));
        out
    }
}

#[async_trait]
impl VaultStore for InMemoryStore {
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    // ========================================================================
    // Users
    // ========================================================================

    async fn create_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        let email = user.email.to_lowercase();
        if users.values().any(|u| u.email.to_lowercase() == email) {
            return Err(StoreError::Conflict(format!("User {} already exists", user.email)).into());
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = email.to_lowercase();
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email.to_lowercase() == email)
            .cloned())
    }

    // ========================================================================
    // Projects
    // ========================================================================

    async fn create_project(&self, project: &Project) -> Result<()> {
        self.projects
            .write()
            .await
            .insert(project.id, project.clone());
        Ok(())
    }

    async fn get_project(&self, user_id: Uuid, id: Uuid) -> Result<Option<Project>> {
        Ok(self
            .projects
            .read()
            .await
            .get(&id)
            .filter(|p| p.user_id == user_id)
            .cloned())
    }

    async fn list_projects(&self, user_id: Uuid) -> Result<Vec<Counted<Project>>> {
        let projects = self.projects.read().await;
        let notes = self.notes.read().await;
        let mut out: Vec<Counted<Project>> = projects
            .values()
            .filter(|p| p.user_id == user_id)
            .map(|p| Counted {
                item: p.clone(),
                note_count: Self::count_under(user_id, ParaRef::Project(p.id), &notes),
            })
            .collect();
        out.sort_by(|a, b| b.item.updated_at.cmp(&a.item.updated_at));
        Ok(out)
    }

    async fn update_project(&self, project: &Project) -> Result<bool> {
        let mut projects = self.projects.write().await;
        match projects.get_mut(&project.id) {
            Some(existing) if existing.user_id == project.user_id => {
                *existing = project.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_project(&self, user_id: Uuid, id: Uuid) -> Result<bool> {
        let mut projects = self.projects.write().await;
        if !projects.get(&id).is_some_and(|p| p.user_id == user_id) {
            return Ok(false);
        }
        projects.remove(&id);
        let mut notes = self.notes.write().await;
        Self::orphan_notes(user_id, ParaRef::Project(id), &mut notes);
        Ok(true)
    }

    // ========================================================================
    // Areas / Resources
    // ========================================================================

    async fn create_collection(&self, collection: &Collection) -> Result<()> {
        self.collections
            .write()
            .await
            .insert(collection.id, collection.clone());
        Ok(())
    }

    async fn get_collection(
        &self,
        user_id: Uuid,
        kind: CollectionKind,
        id: Uuid,
    ) -> Result<Option<Collection>> {
        Ok(self
            .collections
            .read()
            .await
            .get(&id)
            .filter(|c| c.user_id == user_id && c.kind == kind)
            .cloned())
    }

    async fn list_collections(
        &self,
        user_id: Uuid,
        kind: CollectionKind,
    ) -> Result<Vec<Counted<Collection>>> {
        let collections = self.collections.read().await;
        let notes = self.notes.read().await;
        let mut out: Vec<Counted<Collection>> = collections
            .values()
            .filter(|c| c.user_id == user_id && c.kind == kind)
            .map(|c| Counted {
                item: c.clone(),
                note_count: Self::count_under(user_id, ParaRef::collection(kind, c.id), &notes),
            })
            .collect();
        out.sort_by(|a, b| b.item.updated_at.cmp(&a.item.updated_at));
        Ok(out)
    }

    async fn update_collection(&self, collection: &Collection) -> Result<bool> {
        let mut collections = self.collections.write().await;
        match collections.get_mut(&collection.id) {
            Some(existing)
                if existing.user_id == collection.user_id && existing.kind == collection.kind =>
            {
                *existing = collection.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_collection(
        &self,
        user_id: Uuid,
        kind: CollectionKind,
        id: Uuid,
    ) -> Result<bool> {
        let mut collections = self.collections.write().await;
        if !collections
            .get(&id)
            .is_some_and(|c| c.user_id == user_id && c.kind == kind)
        {
            return Ok(false);
        }
        collections.remove(&id);
        let mut notes = self.notes.write().await;
        Self::orphan_notes(user_id, ParaRef::collection(kind, id), &mut notes);
        Ok(true)
    }

    async fn count_notes_under(&self, user_id: Uuid, parent: ParaRef) -> Result<usize> {
        Ok(Self::count_under(user_id, parent, &*self.notes.read().await))
    }

    // ========================================================================
    // Notes
    // ========================================================================

    async fn create_note(&self, note: &Note) -> Result<()> {
        self.notes.write().await.insert(note.id, note.clone());
        Ok(())
    }

    async fn get_note(&self, user_id: Uuid, id: Uuid) -> Result<Option<Note>> {
        Ok(self
            .notes
            .read()
            .await
            .get(&id)
            .filter(|n| n.user_id == user_id)
            .cloned())
    }

    async fn list_notes(
        &self,
        user_id: Uuid,
        filters: &NoteFilters,
    ) -> Result<Vec<NoteWithCounts>> {
        let notes = self.notes.read().await;
        let connections = self.connections.read().await;
        let mut out: Vec<NoteWithCounts> = notes
            .values()
            .filter(|n| n.user_id == user_id && filters.matches(n))
            .map(|n| NoteWithCounts {
                note: n.clone(),
                counts: Self::counts_for(n.id, &connections),
            })
            .collect();
        out.sort_by(|a, b| b.note.created_at.cmp(&a.note.created_at));
        if let Some(limit) = filters.limit {
            out.truncate(limit);
        }
        Ok(out)
    }

    async fn update_note(&self, note: &Note) -> Result<bool> {
        let mut notes = self.notes.write().await;
        match notes.get_mut(&note.id) {
            Some(existing) if existing.user_id == note.user_id => {
                *existing = note.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_note(&self, user_id: Uuid, id: Uuid) -> Result<bool> {
        let mut notes = self.notes.write().await;
        if !notes.get(&id).is_some_and(|n| n.user_id == user_id) {
            return Ok(false);
        }
        notes.remove(&id);
        self.connections
            .write()
            .await
            .retain(|_, c| c.source_note_id != id && c.target_note_id != id);
        Ok(true)
    }

    // ========================================================================
    // Connections
    // ========================================================================

    async fn create_connection(&self, connection: &Connection) -> Result<()> {
        let mut connections = self.connections.write().await;
        if connections.values().any(|c| {
            c.source_note_id == connection.source_note_id
                && c.target_note_id == connection.target_note_id
        }) {
            return Err(StoreError::Conflict("Connection already exists".to_string()).into());
        }
        connections.insert(connection.id, connection.clone());
        Ok(())
    }

    async fn get_connection_by_pair(
        &self,
        source_note_id: Uuid,
        target_note_id: Uuid,
    ) -> Result<Option<Connection>> {
        Ok(self
            .connections
            .read()
            .await
            .values()
            .find(|c| c.source_note_id == source_note_id && c.target_note_id == target_note_id)
            .cloned())
    }

    async fn list_outgoing(&self, user_id: Uuid, note_id: Uuid) -> Result<Vec<(Connection, Note)>> {
        Ok(self
            .edges_with_notes(user_id, |c| {
                (c.source_note_id == note_id).then_some(c.target_note_id)
            })
            .await)
    }

    async fn list_incoming(&self, user_id: Uuid, note_id: Uuid) -> Result<Vec<(Connection, Note)>> {
        Ok(self
            .edges_with_notes(user_id, |c| {
                (c.target_note_id == note_id).then_some(c.source_note_id)
            })
            .await)
    }

    async fn delete_connection(&self, user_id: Uuid, id: Uuid) -> Result<bool> {
        let notes = self.notes.read().await;
        let mut connections = self.connections.write().await;
        let owned = connections.get(&id).is_some_and(|c| {
            notes
                .get(&c.source_note_id)
                .is_some_and(|n| n.user_id == user_id)
        });
        if owned {
            connections.remove(&id);
        }
        Ok(owned)
    }

    // ========================================================================
    // Daily prompts
    // ========================================================================

    async fn get_daily_prompt(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<DailyPrompt>> {
        Ok(self
            .daily_prompts
            .read()
            .await
            .get(&DailyPrompt::day_key(user_id, date))
            .cloned())
    }

    async fn get_or_create_daily_prompt(&self, prompt: &DailyPrompt) -> Result<DailyPrompt> {
        let mut prompts = self.daily_prompts.write().await;
        Ok(prompts
            .entry(DailyPrompt::day_key(prompt.user_id, prompt.date))
            .or_insert_with(|| prompt.clone())
            .clone())
    }

    async fn upsert_daily_response(&self, prompt: &DailyPrompt) -> Result<DailyPrompt> {
        let mut prompts = self.daily_prompts.write().await;
        let key = DailyPrompt::day_key(prompt.user_id, prompt.date);
        let stored = match prompts.get_mut(&key) {
            Some(existing) => {
                existing.response = prompt.response.clone();
                existing.completed = true;
                existing.updated_at = Utc::now();
                existing.clone()
            }
            None => {
                prompts.insert(key, prompt.clone());
                prompt.clone()
            }
        };
        Ok(stored)
    }

    async fn list_daily_prompts(
        &self,
        user_id: Uuid,
        limit: Option<usize>,
    ) -> Result<Vec<DailyPrompt>> {
        let mut out: Vec<DailyPrompt> = self
            .daily_prompts
            .read()
            .await
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.date.cmp(&a.date));
        if let Some(limit) = limit {
            out.truncate(limit);
        }
        Ok(out)
    }
}
