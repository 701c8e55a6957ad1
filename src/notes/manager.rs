//! Note Manager - CRUD operations for notes and the connection graph
//!
//! Handles PARA classification (resolving and validating the single parent a
//! note may be filed under), directed note connections and the review
//! summary shown on the dashboard.

use super::models::*;
use crate::error::{required_trimmed, VaultError, VaultResult};
use crate::para::{CollectionKind, ParaRef};
use crate::store::VaultStore;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Number of notes shown in the review summary's `recent` list
pub const REVIEW_RECENT_LIMIT: usize = 5;

/// Window for `notes_this_week`, in days
const REVIEW_WINDOW_DAYS: i64 = 7;

const TWO_PARENTS: &str = "A note can be filed under only one of project_id, area_id, resource_id";

/// Manager for notes and connections
pub struct NoteManager {
    store: Arc<dyn VaultStore>,
}

impl NoteManager {
    /// Create a new NoteManager
    pub fn new(store: Arc<dyn VaultStore>) -> Self {
        Self { store }
    }

    // ========================================================================
    // Note CRUD
    // ========================================================================

    /// Create a new note, optionally filed under one PARA parent
    pub async fn create_note(&self, user_id: Uuid, req: CreateNoteRequest) -> VaultResult<Note> {
        let title = required_trimmed(&req.title, "Title")?;
        let parent = single_parent(req.project_id, req.area_id, req.resource_id)?;
        if let Some(parent) = parent {
            self.require_parent(user_id, parent).await?;
        }

        let mut note = Note::new(user_id, title, req.content.unwrap_or_default());
        if let Some(tags) = req.tags {
            note.tags = normalize_tags(tags);
        }
        note.source = req.source.unwrap_or_default();
        note.parent = parent;

        self.store.create_note(&note).await?;
        tracing::info!(
            user_id = %user_id,
            note_id = %note.id,
            bucket = %note.bucket(),
            "Note created"
        );
        Ok(note)
    }

    /// Get a note with its parent and both directions of connections
    pub async fn get_note(&self, user_id: Uuid, id: Uuid) -> VaultResult<NoteDetails> {
        let note = self.require_note(user_id, id).await?;
        let classification = self.classification(user_id, note.parent).await?;

        let outgoing = self.store.list_outgoing(user_id, id).await?;
        let incoming = self.store.list_incoming(user_id, id).await?;

        Ok(NoteDetails {
            bucket: note.bucket(),
            note,
            project: classification.project,
            area: classification.area,
            resource: classification.resource,
            connections_as_source: outgoing
                .into_iter()
                .map(|(connection, target)| OutgoingConnection {
                    connection,
                    target_note: NoteSummary::from(&target),
                })
                .collect(),
            connections_as_target: incoming
                .into_iter()
                .map(|(connection, source)| IncomingConnection {
                    connection,
                    source_note: NoteSummary::from(&source),
                })
                .collect(),
        })
    }

    /// List notes matching filters, newest first
    pub async fn list_notes(
        &self,
        user_id: Uuid,
        filters: &NoteFilters,
    ) -> VaultResult<Vec<NoteListItem>> {
        let notes = self.store.list_notes(user_id, filters).await?;
        self.to_list_items(user_id, notes).await
    }

    /// Apply a partial update and return the note as a list entry.
    ///
    /// Classification fields: absent keeps the parent, `null` clears it if the
    /// note is filed under that kind, a value re-files the note there.
    pub async fn update_note(
        &self,
        user_id: Uuid,
        id: Uuid,
        req: UpdateNoteRequest,
    ) -> VaultResult<NoteListItem> {
        let mut note = self.require_note(user_id, id).await?;

        if let Some(title) = req.title {
            note.title = required_trimmed(&title, "Title")?;
        }
        if let Some(content) = req.content {
            note.content = content;
        }
        if let Some(tags) = req.tags {
            note.tags = normalize_tags(tags);
        }

        let new_parent = single_parent(
            req.project_id.flatten(),
            req.area_id.flatten(),
            req.resource_id.flatten(),
        )?;
        match new_parent {
            Some(parent) => {
                self.require_parent(user_id, parent).await?;
                note.parent = Some(parent);
            }
            None => {
                let cleared = matches!(
                    (note.parent, req.project_id, req.area_id, req.resource_id),
                    (Some(ParaRef::Project(_)), Some(None), _, _)
                        | (Some(ParaRef::Area(_)), _, Some(None), _)
                        | (Some(ParaRef::Resource(_)), _, _, Some(None))
                );
                if cleared {
                    note.parent = None;
                }
            }
        }
        note.updated_at = Utc::now();

        if !self.store.update_note(&note).await? {
            return Err(VaultError::not_found("Note not found"));
        }
        tracing::debug!(user_id = %user_id, note_id = %id, bucket = %note.bucket(), "Note updated");

        let counts = ConnectionCounts {
            as_source: self.store.list_outgoing(user_id, id).await?.len(),
            as_target: self.store.list_incoming(user_id, id).await?.len(),
        };
        let mut items = self
            .to_list_items(user_id, vec![NoteWithCounts { note, counts }])
            .await?;
        items
            .pop()
            .ok_or_else(|| VaultError::not_found("Note not found"))
    }

    /// Delete a note and every connection touching it
    pub async fn delete_note(&self, user_id: Uuid, id: Uuid) -> VaultResult<()> {
        if !self.store.delete_note(user_id, id).await? {
            return Err(VaultError::not_found("Note not found"));
        }
        tracing::info!(user_id = %user_id, note_id = %id, "Note deleted");
        Ok(())
    }

    // ========================================================================
    // Connections
    // ========================================================================

    /// Create a directed connection between two of the caller's notes
    pub async fn create_connection(
        &self,
        user_id: Uuid,
        req: CreateConnectionRequest,
    ) -> VaultResult<ConnectionWithNotes> {
        let (Some(source_id), Some(target_id)) = (req.source_note_id, req.target_note_id) else {
            return Err(VaultError::validation(
                "source_note_id and target_note_id are required",
            ));
        };
        let strength = req.strength.unwrap_or(DEFAULT_CONNECTION_STRENGTH);
        if strength < 1 {
            return Err(VaultError::validation("strength must be at least 1"));
        }

        let source = self.store.get_note(user_id, source_id).await?;
        let target = self.store.get_note(user_id, target_id).await?;
        let (Some(source), Some(target)) = (source, target) else {
            return Err(VaultError::not_found("Note not found"));
        };

        if self
            .store
            .get_connection_by_pair(source.id, target.id)
            .await?
            .is_some()
        {
            return Err(VaultError::conflict("Connection already exists"));
        }

        let connection = Connection::new(source.id, target.id, strength);
        self.store
            .create_connection(&connection)
            .await
            .map_err(VaultError::from_store)?;

        tracing::info!(
            user_id = %user_id,
            connection_id = %connection.id,
            source = %source.id,
            target = %target.id,
            "Connection created"
        );
        Ok(ConnectionWithNotes {
            connection,
            source_note: NoteRef {
                id: source.id,
                title: source.title,
            },
            target_note: NoteRef {
                id: target.id,
                title: target.title,
            },
        })
    }

    pub async fn delete_connection(&self, user_id: Uuid, id: Uuid) -> VaultResult<()> {
        if !self.store.delete_connection(user_id, id).await? {
            return Err(VaultError::not_found("Connection not found"));
        }
        tracing::info!(user_id = %user_id, connection_id = %id, "Connection deleted");
        Ok(())
    }

    // ========================================================================
    // Review
    // ========================================================================

    /// Dashboard totals over all of the caller's notes
    pub async fn review_summary(&self, user_id: Uuid) -> VaultResult<ReviewSummary> {
        let notes = self
            .store
            .list_notes(user_id, &NoteFilters::default())
            .await?;

        let week_ago = Utc::now() - Duration::days(REVIEW_WINDOW_DAYS);
        let notes_this_week = notes
            .iter()
            .filter(|n| n.note.created_at >= week_ago)
            .count();
        let connections = notes.iter().map(|n| n.counts.total()).sum();
        let total_notes = notes.len();

        let recent = notes.into_iter().take(REVIEW_RECENT_LIMIT).collect();
        Ok(ReviewSummary {
            total_notes,
            notes_this_week,
            connections,
            recent: self.to_list_items(user_id, recent).await?,
        })
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    async fn require_note(&self, user_id: Uuid, id: Uuid) -> VaultResult<Note> {
        self.store
            .get_note(user_id, id)
            .await?
            .ok_or_else(|| VaultError::not_found("Note not found"))
    }

    /// Fail with NotFound unless the parent exists and belongs to the caller
    async fn require_parent(&self, user_id: Uuid, parent: ParaRef) -> VaultResult<()> {
        let exists = match parent {
            ParaRef::Project(id) => self.store.get_project(user_id, id).await?.is_some(),
            ParaRef::Area(id) => self
                .store
                .get_collection(user_id, CollectionKind::Area, id)
                .await?
                .is_some(),
            ParaRef::Resource(id) => self
                .store
                .get_collection(user_id, CollectionKind::Resource, id)
                .await?
                .is_some(),
        };
        if exists {
            Ok(())
        } else {
            Err(VaultError::not_found(match parent {
                ParaRef::Project(_) => "Project not found",
                ParaRef::Area(_) => "Area not found",
                ParaRef::Resource(_) => "Resource not found",
            }))
        }
    }

    async fn classification(
        &self,
        user_id: Uuid,
        parent: Option<ParaRef>,
    ) -> VaultResult<Classification> {
        let mut out = Classification::default();
        match parent {
            Some(ParaRef::Project(id)) => {
                out.project = self.store.get_project(user_id, id).await?;
            }
            Some(ParaRef::Area(id)) => {
                out.area = self
                    .store
                    .get_collection(user_id, CollectionKind::Area, id)
                    .await?;
            }
            Some(ParaRef::Resource(id)) => {
                out.resource = self
                    .store
                    .get_collection(user_id, CollectionKind::Resource, id)
                    .await?;
            }
            None => {}
        }
        Ok(out)
    }

    /// Attach resolved parents, looking each distinct parent up once
    async fn to_list_items(
        &self,
        user_id: Uuid,
        notes: Vec<NoteWithCounts>,
    ) -> VaultResult<Vec<NoteListItem>> {
        let mut parents: HashMap<ParaRef, Classification> = HashMap::new();
        let mut items = Vec::with_capacity(notes.len());
        for NoteWithCounts { note, counts } in notes {
            let classification = match note.parent {
                Some(parent) => match parents.get(&parent) {
                    Some(c) => c.clone(),
                    None => {
                        let c = self.classification(user_id, Some(parent)).await?;
                        parents.insert(parent, c.clone());
                        c
                    }
                },
                None => Classification::default(),
            };
            items.push(NoteListItem {
                bucket: note.bucket(),
                note,
                project: classification.project,
                area: classification.area,
                resource: classification.resource,
                connection_counts: counts,
            });
        }
        Ok(items)
    }
}

/// Collapse the three optional parent ids into at most one reference
fn single_parent(
    project_id: Option<Uuid>,
    area_id: Option<Uuid>,
    resource_id: Option<Uuid>,
) -> VaultResult<Option<ParaRef>> {
    let refs: Vec<ParaRef> = [
        project_id.map(ParaRef::Project),
        area_id.map(ParaRef::Area),
        resource_id.map(ParaRef::Resource),
    ]
    .into_iter()
    .flatten()
    .collect();

    match refs.as_slice() {
        [] => Ok(None),
        [one] => Ok(Some(*one)),
        _ => Err(VaultError::validation(TWO_PARENTS)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::para::ParaBucket;
    use crate::store::InMemoryStore;
    use crate::test_helpers::{test_area, test_note, test_project};

    /// Helper: build a NoteManager over an empty in-memory store.
    fn create_note_manager() -> (NoteManager, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        (NoteManager::new(store.clone()), store)
    }

    fn make_create_request(title: &str) -> CreateNoteRequest {
        CreateNoteRequest {
            title: title.to_string(),
            ..Default::default()
        }
    }

    // ====================================================================
    // Note CRUD
    // ====================================================================

    #[tokio::test]
    async fn test_create_note_defaults() {
        let (mgr, _) = create_note_manager();
        let note = mgr
            .create_note(Uuid::new_v4(), make_create_request("  First thought  "))
            .await
            .unwrap();
        assert_eq!(note.title, "First thought");
        assert_eq!(note.content, "");
        assert_eq!(note.tags, vec![NoteTag::Note]);
        assert_eq!(note.source, NoteSource::Manual);
        assert_eq!(note.bucket(), ParaBucket::Archive);
    }

    #[tokio::test]
    async fn test_create_note_rejects_blank_title() {
        let (mgr, store) = create_note_manager();
        let err = mgr
            .create_note(Uuid::new_v4(), make_create_request("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, VaultError::Validation(_)));
        assert!(store.notes.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_note_dedupes_tags() {
        let (mgr, _) = create_note_manager();
        let note = mgr
            .create_note(
                Uuid::new_v4(),
                CreateNoteRequest {
                    title: "t".into(),
                    tags: Some(vec![NoteTag::Win, NoteTag::Idea, NoteTag::Win]),
                    source: Some(NoteSource::Capture),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(note.tags, vec![NoteTag::Win, NoteTag::Idea]);
        assert_eq!(note.source, NoteSource::Capture);
    }

    #[tokio::test]
    async fn test_create_note_with_two_parents_fails() {
        let (mgr, store) = create_note_manager();
        let user = Uuid::new_v4();
        let project = test_project(user, "Launch");
        let area = test_area(user, "Health");
        store.create_project(&project).await.unwrap();
        store.create_collection(&area).await.unwrap();

        let err = mgr
            .create_note(
                user,
                CreateNoteRequest {
                    title: "t".into(),
                    project_id: Some(project.id),
                    area_id: Some(area.id),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, VaultError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_note_with_foreign_parent_is_not_found() {
        let (mgr, store) = create_note_manager();
        let area = test_area(Uuid::new_v4(), "Someone else's");
        store.create_collection(&area).await.unwrap();

        let err = mgr
            .create_note(
                Uuid::new_v4(),
                CreateNoteRequest {
                    title: "t".into(),
                    area_id: Some(area.id),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, VaultError::NotFound(ref m) if m == "Area not found"));
    }

    #[tokio::test]
    async fn test_foreign_note_behaves_as_missing() {
        let (mgr, _) = create_note_manager();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let note = mgr.create_note(owner, make_create_request("mine")).await.unwrap();

        assert!(matches!(
            mgr.get_note(stranger, note.id).await,
            Err(VaultError::NotFound(_))
        ));
        assert!(matches!(
            mgr.update_note(
                stranger,
                note.id,
                UpdateNoteRequest {
                    title: Some("stolen".into()),
                    ..Default::default()
                }
            )
            .await,
            Err(VaultError::NotFound(_))
        ));
        assert!(matches!(
            mgr.delete_note(stranger, note.id).await,
            Err(VaultError::NotFound(_))
        ));
        assert_eq!(mgr.get_note(owner, note.id).await.unwrap().note.title, "mine");
    }

    // ====================================================================
    // Update tri-state
    // ====================================================================

    #[tokio::test]
    async fn test_update_absent_fields_are_preserved() {
        let (mgr, store) = create_note_manager();
        let user = Uuid::new_v4();
        let area = test_area(user, "Health");
        store.create_collection(&area).await.unwrap();
        let note = mgr
            .create_note(
                user,
                CreateNoteRequest {
                    title: "run".into(),
                    content: Some("5k".into()),
                    tags: Some(vec![NoteTag::Win]),
                    area_id: Some(area.id),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let updated = mgr
            .update_note(
                user,
                note.id,
                UpdateNoteRequest {
                    content: Some("10k".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.note.title, "run");
        assert_eq!(updated.note.content, "10k");
        assert_eq!(updated.note.tags, vec![NoteTag::Win]);
        assert_eq!(updated.note.area_id(), Some(area.id));
        assert!(updated.note.updated_at >= note.updated_at);
    }

    #[tokio::test]
    async fn test_update_null_clears_matching_parent_only() {
        let (mgr, store) = create_note_manager();
        let user = Uuid::new_v4();
        let area = test_area(user, "Health");
        store.create_collection(&area).await.unwrap();
        let note = mgr
            .create_note(
                user,
                CreateNoteRequest {
                    title: "run".into(),
                    area_id: Some(area.id),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // Clearing a kind the note is not filed under is a no-op
        let same = mgr
            .update_note(
                user,
                note.id,
                UpdateNoteRequest {
                    project_id: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(same.note.area_id(), Some(area.id));

        let cleared = mgr
            .update_note(
                user,
                note.id,
                UpdateNoteRequest {
                    area_id: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.note.bucket(), ParaBucket::Archive);
    }

    #[tokio::test]
    async fn test_update_refiles_note_to_single_parent() {
        let (mgr, store) = create_note_manager();
        let user = Uuid::new_v4();
        let area = test_area(user, "Health");
        let project = test_project(user, "Marathon");
        store.create_collection(&area).await.unwrap();
        store.create_project(&project).await.unwrap();
        let note = mgr
            .create_note(
                user,
                CreateNoteRequest {
                    title: "run".into(),
                    area_id: Some(area.id),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let moved = mgr
            .update_note(
                user,
                note.id,
                UpdateNoteRequest {
                    project_id: Some(Some(project.id)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(moved.note.project_id(), Some(project.id));
        assert_eq!(moved.note.area_id(), None);
        assert_eq!(moved.bucket, ParaBucket::Project);
        assert_eq!(moved.project.as_ref().map(|p| p.name.as_str()), Some("Marathon"));
        assert!(moved.area.is_none());

        let err = mgr
            .update_note(
                user,
                note.id,
                UpdateNoteRequest {
                    project_id: Some(Some(project.id)),
                    area_id: Some(Some(area.id)),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, VaultError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_rejects_empty_title() {
        let (mgr, _) = create_note_manager();
        let user = Uuid::new_v4();
        let note = mgr.create_note(user, make_create_request("t")).await.unwrap();
        let err = mgr
            .update_note(
                user,
                note.id,
                UpdateNoteRequest {
                    title: Some("".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, VaultError::Validation(_)));
    }

    // ====================================================================
    // Listing
    // ====================================================================

    #[tokio::test]
    async fn test_list_notes_embeds_parent_and_filters_bucket() {
        let (mgr, store) = create_note_manager();
        let user = Uuid::new_v4();
        let area = test_area(user, "Health");
        store.create_collection(&area).await.unwrap();

        mgr.create_note(
            user,
            CreateNoteRequest {
                title: "filed".into(),
                area_id: Some(area.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        mgr.create_note(user, make_create_request("loose")).await.unwrap();

        let all = mgr.list_notes(user, &NoteFilters::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let areas = mgr
            .list_notes(
                user,
                &NoteFilters {
                    bucket: Some(ParaBucket::Area),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].area.as_ref().map(|a| a.name.as_str()), Some("Health"));
        assert!(areas[0].project.is_none());

        let archive = mgr
            .list_notes(
                user,
                &NoteFilters {
                    bucket: Some(ParaBucket::Archive),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(archive.len(), 1);
        assert_eq!(archive[0].note.title, "loose");
    }

    // ====================================================================
    // Connections
    // ====================================================================

    #[tokio::test]
    async fn test_connection_lifecycle() {
        let (mgr, _) = create_note_manager();
        let user = Uuid::new_v4();
        let a = mgr.create_note(user, make_create_request("A")).await.unwrap();
        let b = mgr.create_note(user, make_create_request("B")).await.unwrap();

        let created = mgr
            .create_connection(
                user,
                CreateConnectionRequest {
                    source_note_id: Some(a.id),
                    target_note_id: Some(b.id),
                    strength: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(created.connection.strength, DEFAULT_CONNECTION_STRENGTH);
        assert_eq!(created.source_note.title, "A");
        assert_eq!(created.target_note.title, "B");

        let dup = mgr
            .create_connection(
                user,
                CreateConnectionRequest {
                    source_note_id: Some(a.id),
                    target_note_id: Some(b.id),
                    strength: Some(5),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(dup, VaultError::Conflict(_)));

        // Reverse direction is a distinct pair
        mgr.create_connection(
            user,
            CreateConnectionRequest {
                source_note_id: Some(b.id),
                target_note_id: Some(a.id),
                strength: Some(2),
            },
        )
        .await
        .unwrap();

        let details = mgr.get_note(user, a.id).await.unwrap();
        assert_eq!(details.connections_as_source.len(), 1);
        assert_eq!(details.connections_as_source[0].target_note.id, b.id);
        assert_eq!(details.connections_as_target.len(), 1);
        assert_eq!(details.connections_as_target[0].source_note.id, b.id);

        mgr.delete_connection(user, created.connection.id).await.unwrap();
        let details = mgr.get_note(user, a.id).await.unwrap();
        assert!(details.connections_as_source.is_empty());
    }

    #[tokio::test]
    async fn test_connection_validation() {
        let (mgr, _) = create_note_manager();
        let user = Uuid::new_v4();
        let a = mgr.create_note(user, make_create_request("A")).await.unwrap();
        let foreign = mgr
            .create_note(Uuid::new_v4(), make_create_request("theirs"))
            .await
            .unwrap();

        let missing = mgr
            .create_connection(
                user,
                CreateConnectionRequest {
                    source_note_id: Some(a.id),
                    target_note_id: None,
                    strength: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(missing, VaultError::Validation(_)));

        let weak = mgr
            .create_connection(
                user,
                CreateConnectionRequest {
                    source_note_id: Some(a.id),
                    target_note_id: Some(a.id),
                    strength: Some(0),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(weak, VaultError::Validation(_)));

        let cross_user = mgr
            .create_connection(
                user,
                CreateConnectionRequest {
                    source_note_id: Some(a.id),
                    target_note_id: Some(foreign.id),
                    strength: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(cross_user, VaultError::NotFound(_)));

        // Self-loops are allowed
        mgr.create_connection(
            user,
            CreateConnectionRequest {
                source_note_id: Some(a.id),
                target_note_id: Some(a.id),
                strength: None,
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_delete_note_removes_connections() {
        let (mgr, store) = create_note_manager();
        let user = Uuid::new_v4();
        let a = mgr.create_note(user, make_create_request("A")).await.unwrap();
        let b = mgr.create_note(user, make_create_request("B")).await.unwrap();
        mgr.create_connection(
            user,
            CreateConnectionRequest {
                source_note_id: Some(a.id),
                target_note_id: Some(b.id),
                strength: None,
            },
        )
        .await
        .unwrap();

        mgr.delete_note(user, b.id).await.unwrap();
        assert!(store.connections.read().await.is_empty());
        let details = mgr.get_note(user, a.id).await.unwrap();
        assert!(details.connections_as_source.is_empty());
    }

    // ====================================================================
    // Review
    // ====================================================================

    #[tokio::test]
    async fn test_review_summary_counts() {
        let (mgr, store) = create_note_manager();
        let user = Uuid::new_v4();
        let mut old = test_note(user, "old");
        old.created_at = Utc::now() - Duration::days(30);
        store.create_note(&old).await.unwrap();

        let mut ids = vec![old.id];
        for i in 0..6 {
            let n = mgr
                .create_note(user, make_create_request(&format!("n{}", i)))
                .await
                .unwrap();
            ids.push(n.id);
        }
        mgr.create_connection(
            user,
            CreateConnectionRequest {
                source_note_id: Some(ids[1]),
                target_note_id: Some(ids[0]),
                strength: None,
            },
        )
        .await
        .unwrap();

        let summary = mgr.review_summary(user).await.unwrap();
        assert_eq!(summary.total_notes, 7);
        assert_eq!(summary.notes_this_week, 6);
        assert_eq!(summary.connections, 2);
        assert_eq!(summary.recent.len(), REVIEW_RECENT_LIMIT);
        assert!(summary.recent.iter().all(|n| n.note.id != old.id));
    }
}
