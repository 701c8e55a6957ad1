//! PARA Manager - CRUD operations for Projects, Areas and Resources
//!
//! Every operation takes the caller's `user_id` and passes it down to the
//! store, so another user's container is indistinguishable from a missing one.

use super::models::*;
use crate::error::{optional_trimmed, required_trimmed, VaultError, VaultResult};
use crate::store::VaultStore;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Manager for PARA containers
pub struct ParaManager {
    store: Arc<dyn VaultStore>,
}

impl ParaManager {
    pub fn new(store: Arc<dyn VaultStore>) -> Self {
        Self { store }
    }

    // ========================================================================
    // Projects
    // ========================================================================

    /// Create a project. Blank status falls back to the default.
    pub async fn create_project(
        &self,
        user_id: Uuid,
        req: CreateProjectRequest,
    ) -> VaultResult<Project> {
        let name = required_trimmed(&req.name, "Name")?;
        let mut project = Project::new(user_id, name, optional_trimmed(req.description));
        if let Some(status) = optional_trimmed(req.status) {
            project.status = status;
        }
        project.target_date = req.target_date;

        self.store.create_project(&project).await?;
        tracing::info!(user_id = %user_id, project_id = %project.id, "Project created");
        Ok(project)
    }

    pub async fn list_projects(&self, user_id: Uuid) -> VaultResult<Vec<Counted<Project>>> {
        Ok(self.store.list_projects(user_id).await?)
    }

    /// Get a project with the number of notes filed under it
    pub async fn get_project(&self, user_id: Uuid, id: Uuid) -> VaultResult<Counted<Project>> {
        let project = self.require_project(user_id, id).await?;
        let note_count = self
            .store
            .count_notes_under(user_id, ParaRef::Project(id))
            .await?;
        Ok(Counted {
            item: project,
            note_count,
        })
    }

    /// Apply a partial update; absent fields are preserved
    pub async fn update_project(
        &self,
        user_id: Uuid,
        id: Uuid,
        req: UpdateProjectRequest,
    ) -> VaultResult<Project> {
        let mut project = self.require_project(user_id, id).await?;

        if let Some(name) = req.name {
            project.name = required_trimmed(&name, "Name")?;
        }
        if let Some(description) = req.description {
            project.description = optional_trimmed(description);
        }
        if let Some(status) = req.status {
            project.status = required_trimmed(&status, "Status")?;
        }
        if let Some(target_date) = req.target_date {
            project.target_date = target_date;
        }
        project.updated_at = Utc::now();

        if !self.store.update_project(&project).await? {
            return Err(VaultError::not_found("Project not found"));
        }
        tracing::debug!(user_id = %user_id, project_id = %id, "Project updated");
        Ok(project)
    }

    /// Delete a project; its notes fall back to Archive
    pub async fn delete_project(&self, user_id: Uuid, id: Uuid) -> VaultResult<()> {
        if !self.store.delete_project(user_id, id).await? {
            return Err(VaultError::not_found("Project not found"));
        }
        tracing::info!(user_id = %user_id, project_id = %id, "Project deleted");
        Ok(())
    }

    async fn require_project(&self, user_id: Uuid, id: Uuid) -> VaultResult<Project> {
        self.store
            .get_project(user_id, id)
            .await?
            .ok_or_else(|| VaultError::not_found("Project not found"))
    }

    // ========================================================================
    // Areas / Resources
    // ========================================================================

    pub async fn create_collection(
        &self,
        user_id: Uuid,
        kind: CollectionKind,
        req: CreateCollectionRequest,
    ) -> VaultResult<Collection> {
        let name = required_trimmed(&req.name, "Name")?;
        let collection = Collection::new(user_id, kind, name, optional_trimmed(req.description));

        self.store.create_collection(&collection).await?;
        tracing::info!(
            user_id = %user_id,
            kind = %kind,
            collection_id = %collection.id,
            "Collection created"
        );
        Ok(collection)
    }

    pub async fn list_collections(
        &self,
        user_id: Uuid,
        kind: CollectionKind,
    ) -> VaultResult<Vec<Counted<Collection>>> {
        Ok(self.store.list_collections(user_id, kind).await?)
    }

    pub async fn get_collection(
        &self,
        user_id: Uuid,
        kind: CollectionKind,
        id: Uuid,
    ) -> VaultResult<Counted<Collection>> {
        let collection = self.require_collection(user_id, kind, id).await?;
        let note_count = self
            .store
            .count_notes_under(user_id, ParaRef::collection(kind, id))
            .await?;
        Ok(Counted {
            item: collection,
            note_count,
        })
    }

    pub async fn update_collection(
        &self,
        user_id: Uuid,
        kind: CollectionKind,
        id: Uuid,
        req: UpdateCollectionRequest,
    ) -> VaultResult<Collection> {
        let mut collection = self.require_collection(user_id, kind, id).await?;

        if let Some(name) = req.name {
            collection.name = required_trimmed(&name, "Name")?;
        }
        if let Some(description) = req.description {
            collection.description = optional_trimmed(description);
        }
        collection.updated_at = Utc::now();

        if !self.store.update_collection(&collection).await? {
            return Err(not_found(kind));
        }
        Ok(collection)
    }

    /// Delete an area or resource; its notes fall back to Archive
    pub async fn delete_collection(
        &self,
        user_id: Uuid,
        kind: CollectionKind,
        id: Uuid,
    ) -> VaultResult<()> {
        if !self.store.delete_collection(user_id, kind, id).await? {
            return Err(not_found(kind));
        }
        tracing::info!(user_id = %user_id, kind = %kind, collection_id = %id, "Collection deleted");
        Ok(())
    }

    async fn require_collection(
        &self,
        user_id: Uuid,
        kind: CollectionKind,
        id: Uuid,
    ) -> VaultResult<Collection> {
        self.store
            .get_collection(user_id, kind, id)
            .await?
            .ok_or_else(|| not_found(kind))
    }
}

fn not_found(kind: CollectionKind) -> VaultError {
    VaultError::not_found(format!("{} not found", kind.label()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use crate::test_helpers::test_note;
    use chrono::NaiveDate;

    fn manager() -> (ParaManager, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        (ParaManager::new(store.clone()), store)
    }

    fn collection_req(name: &str, description: Option<&str>) -> CreateCollectionRequest {
        CreateCollectionRequest {
            name: name.to_string(),
            description: description.map(String::from),
        }
    }

    // ====================================================================
    // Create
    // ====================================================================

    #[tokio::test]
    async fn test_create_collection_trims_fields() {
        let (mgr, _) = manager();
        let user = Uuid::new_v4();
        let area = mgr
            .create_collection(
                user,
                CollectionKind::Area,
                collection_req("  Health  ", Some("   ")),
            )
            .await
            .unwrap();
        assert_eq!(area.name, "Health");
        assert_eq!(area.description, None);
        assert_eq!(area.kind, CollectionKind::Area);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_names() {
        let (mgr, store) = manager();
        let user = Uuid::new_v4();
        for kind in [CollectionKind::Area, CollectionKind::Resource] {
            let err = mgr
                .create_collection(user, kind, collection_req(" \t ", None))
                .await
                .unwrap_err();
            assert!(matches!(err, VaultError::Validation(_)));
        }
        let err = mgr
            .create_project(
                user,
                CreateProjectRequest {
                    name: "   ".into(),
                    description: None,
                    status: None,
                    target_date: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, VaultError::Validation(_)));
        assert!(store.collections.read().await.is_empty());
        assert!(store.projects.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_project_defaults_status() {
        let (mgr, _) = manager();
        let project = mgr
            .create_project(
                Uuid::new_v4(),
                CreateProjectRequest {
                    name: "Launch".into(),
                    description: Some(" ship v1 ".into()),
                    status: Some("  ".into()),
                    target_date: NaiveDate::from_ymd_opt(2026, 12, 1),
                },
            )
            .await
            .unwrap();
        assert_eq!(project.status, DEFAULT_PROJECT_STATUS);
        assert_eq!(project.description.as_deref(), Some("ship v1"));
        assert_eq!(project.target_date, NaiveDate::from_ymd_opt(2026, 12, 1));
    }

    // ====================================================================
    // Read / update
    // ====================================================================

    #[tokio::test]
    async fn test_get_collection_counts_notes_and_hides_foreign() {
        let (mgr, store) = manager();
        let user = Uuid::new_v4();
        let area = mgr
            .create_collection(user, CollectionKind::Area, collection_req("Health", None))
            .await
            .unwrap();

        let mut note = test_note(user, "run");
        note.parent = Some(ParaRef::Area(area.id));
        store.notes.write().await.insert(note.id, note);

        let counted = mgr
            .get_collection(user, CollectionKind::Area, area.id)
            .await
            .unwrap();
        assert_eq!(counted.note_count, 1);

        let err = mgr
            .get_collection(Uuid::new_v4(), CollectionKind::Area, area.id)
            .await
            .unwrap_err();
        assert!(matches!(err, VaultError::NotFound(ref m) if m == "Area not found"));

        let err = mgr
            .get_collection(user, CollectionKind::Resource, area.id)
            .await
            .unwrap_err();
        assert!(matches!(err, VaultError::NotFound(ref m) if m == "Resource not found"));
    }

    #[tokio::test]
    async fn test_update_project_preserves_absent_fields() {
        let (mgr, _) = manager();
        let user = Uuid::new_v4();
        let project = mgr
            .create_project(
                user,
                CreateProjectRequest {
                    name: "Launch".into(),
                    description: Some("ship v1".into()),
                    status: Some("planning".into()),
                    target_date: NaiveDate::from_ymd_opt(2026, 12, 1),
                },
            )
            .await
            .unwrap();

        let updated = mgr
            .update_project(
                user,
                project.id,
                UpdateProjectRequest {
                    name: Some(" Launch v2 ".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Launch v2");
        assert_eq!(updated.description.as_deref(), Some("ship v1"));
        assert_eq!(updated.status, "planning");
        assert!(updated.target_date.is_some());
        assert!(updated.updated_at >= project.updated_at);

        let cleared = mgr
            .update_project(
                user,
                project.id,
                UpdateProjectRequest {
                    description: Some(None),
                    target_date: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.description, None);
        assert_eq!(cleared.target_date, None);
        assert_eq!(cleared.name, "Launch v2");
    }

    #[tokio::test]
    async fn test_update_rejects_blank_name() {
        let (mgr, _) = manager();
        let user = Uuid::new_v4();
        let resource = mgr
            .create_collection(user, CollectionKind::Resource, collection_req("Rust", None))
            .await
            .unwrap();
        let err = mgr
            .update_collection(
                user,
                CollectionKind::Resource,
                resource.id,
                UpdateCollectionRequest {
                    name: Some("  ".into()),
                    description: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, VaultError::Validation(_)));
    }

    // ====================================================================
    // Delete
    // ====================================================================

    #[tokio::test]
    async fn test_delete_project_archives_notes() {
        let (mgr, store) = manager();
        let user = Uuid::new_v4();
        let project = mgr
            .create_project(
                user,
                CreateProjectRequest {
                    name: "Launch".into(),
                    description: None,
                    status: None,
                    target_date: None,
                },
            )
            .await
            .unwrap();
        let mut note = test_note(user, "kickoff");
        note.parent = Some(ParaRef::Project(project.id));
        let note_id = note.id;
        store.notes.write().await.insert(note_id, note);

        mgr.delete_project(user, project.id).await.unwrap();

        let note = store.get_note(user, note_id).await.unwrap().unwrap();
        assert_eq!(note.bucket(), ParaBucket::Archive);
        assert!(matches!(
            mgr.delete_project(user, project.id).await,
            Err(VaultError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_collections_scoped_by_kind_and_user() {
        let (mgr, _) = manager();
        let user = Uuid::new_v4();
        mgr.create_collection(user, CollectionKind::Area, collection_req("Health", None))
            .await
            .unwrap();
        mgr.create_collection(user, CollectionKind::Resource, collection_req("Rust", None))
            .await
            .unwrap();
        mgr.create_collection(
            Uuid::new_v4(),
            CollectionKind::Area,
            collection_req("Other", None),
        )
        .await
        .unwrap();

        let areas = mgr.list_collections(user, CollectionKind::Area).await.unwrap();
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].item.name, "Health");
        assert_eq!(areas[0].note_count, 0);
    }
}
