//! Neo4j client for the vault graph
//!
//! Nodes: `User`, `Project`, `Area`, `Resource`, `Note`, `DailyPrompt`.
//! Notes reference their PARA parent through `project_id` / `area_id` /
//! `resource_id` properties (empty string when unset). Connections are
//! `(:Note)-[:CONNECTS]->(:Note)` relationships, so deleting a note with
//! `DETACH DELETE` removes its connections with it.
//!
//! Timestamps are stored as RFC 3339 strings with fixed microsecond
//! precision so that string ordering matches chronological ordering.

use super::models::{StoreError, User};
use crate::notes::{Connection, ConnectionCounts, Note, NoteFilters, NoteSource, NoteWithCounts};
use crate::para::{Collection, CollectionKind, Counted, ParaBucket, ParaRef, Project};
use crate::prompts::DailyPrompt;
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use neo4rs::{query, Graph, Query};
use std::sync::Arc;
use uuid::Uuid;

/// Client for Neo4j operations
pub struct Neo4jClient {
    graph: Arc<Graph>,
}

fn ts(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_ts(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Invalid stored timestamp: {:?}", raw))
}

/// Empty strings are how optional values are stored
fn non_empty(raw: Option<String>) -> Option<String> {
    raw.filter(|s| !s.is_empty())
}

fn parse_uuid(raw: Option<String>) -> Option<Uuid> {
    non_empty(raw).and_then(|s| s.parse().ok())
}

/// Note property holding a parent of this kind
fn parent_field(parent: &ParaRef) -> &'static str {
    match parent {
        ParaRef::Project(_) => "project_id",
        ParaRef::Area(_) => "area_id",
        ParaRef::Resource(_) => "resource_id",
    }
}

/// Builder for the WHERE clause of note listings.
///
/// Values are always bound as parameters; only fixed fragments are
/// interpolated into the query text.
#[derive(Default)]
struct NoteWhere {
    conditions: Vec<&'static str>,
    tags: Option<Vec<String>>,
    search: Option<String>,
}

impl NoteWhere {
    fn from_filters(filters: &NoteFilters) -> Self {
        let mut w = Self::default();
        if let Some(bucket) = filters.bucket {
            w.conditions.push(match bucket {
                ParaBucket::Project => "n.project_id <> ''",
                ParaBucket::Area => "n.area_id <> ''",
                ParaBucket::Resource => "n.resource_id <> ''",
                ParaBucket::Archive => {
                    "n.project_id = '' AND n.area_id = '' AND n.resource_id = ''"
                }
            });
        }
        if let Some(ref tags) = filters.tags {
            if !tags.is_empty() {
                w.conditions.push("ANY(t IN n.tags WHERE t IN $tags)");
                w.tags = Some(tags.iter().map(|t| t.to_string()).collect());
            }
        }
        if let Some(ref search) = filters.search {
            let needle = search.trim().to_lowercase();
            if !needle.is_empty() {
                w.conditions.push(
                    "(toLower(n.title) CONTAINS $search OR toLower(n.content) CONTAINS $search)",
                );
                w.search = Some(needle);
            }
        }
        w
    }

    fn clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("AND {}", self.conditions.join(" AND "))
        }
    }

    fn bind(self, mut q: Query) -> Query {
        if let Some(tags) = self.tags {
            q = q.param("tags", tags);
        }
        if let Some(search) = self.search {
            q = q.param("search", search);
        }
        q
    }
}

impl Neo4jClient {
    /// Create a new Neo4j client
    pub async fn new(uri: &str, user: &str, password: &str) -> Result<Self> {
        let graph = Graph::new(uri, user, password)
            .await
            .context("Failed to connect to Neo4j")?;

        let client = Self {
            graph: Arc::new(graph),
        };

        client.init_schema().await?;

        Ok(client)
    }

    /// Initialize the graph schema with constraints and indexes
    async fn init_schema(&self) -> Result<()> {
        let constraints = vec![
            "CREATE CONSTRAINT user_id IF NOT EXISTS FOR (u:User) REQUIRE u.id IS UNIQUE",
            "CREATE CONSTRAINT user_email IF NOT EXISTS FOR (u:User) REQUIRE u.email_lower IS UNIQUE",
            "CREATE CONSTRAINT project_id IF NOT EXISTS FOR (p:Project) REQUIRE p.id IS UNIQUE",
            "CREATE CONSTRAINT area_id IF NOT EXISTS FOR (a:Area) REQUIRE a.id IS UNIQUE",
            "CREATE CONSTRAINT resource_id IF NOT EXISTS FOR (r:Resource) REQUIRE r.id IS UNIQUE",
            "CREATE CONSTRAINT note_id IF NOT EXISTS FOR (n:Note) REQUIRE n.id IS UNIQUE",
            "CREATE CONSTRAINT daily_prompt_key IF NOT EXISTS FOR (d:DailyPrompt) REQUIRE d.key IS UNIQUE",
        ];

        let indexes = vec![
            "CREATE INDEX project_user IF NOT EXISTS FOR (p:Project) ON (p.user_id)",
            "CREATE INDEX area_user IF NOT EXISTS FOR (a:Area) ON (a.user_id)",
            "CREATE INDEX resource_user IF NOT EXISTS FOR (r:Resource) ON (r.user_id)",
            "CREATE INDEX note_user IF NOT EXISTS FOR (n:Note) ON (n.user_id)",
            "CREATE INDEX note_project IF NOT EXISTS FOR (n:Note) ON (n.project_id)",
            "CREATE INDEX note_area IF NOT EXISTS FOR (n:Note) ON (n.area_id)",
            "CREATE INDEX note_resource IF NOT EXISTS FOR (n:Note) ON (n.resource_id)",
            "CREATE INDEX note_created IF NOT EXISTS FOR (n:Note) ON (n.created_at)",
            "CREATE INDEX daily_prompt_user IF NOT EXISTS FOR (d:DailyPrompt) ON (d.user_id)",
        ];

        for c in constraints.into_iter().chain(indexes) {
            if let Err(e) = self.graph.run(query(c)).await {
                tracing::warn!("Schema statement may already exist: {}", e);
            }
        }

        Ok(())
    }

    /// Check connectivity with a trivial query
    pub async fn health_check(&self) -> Result<bool> {
        let mut result = self.graph.execute(query("RETURN 1 AS ok")).await?;
        Ok(result.next().await?.is_some())
    }

    // ========================================================================
    // User operations
    // ========================================================================

    pub async fn create_user(&self, user: &User) -> Result<()> {
        let q = query(
            r#"
            MERGE (u:User {email_lower: $email_lower})
            ON CREATE SET
                u.id = $id,
                u.email = $email,
                u.name = $name,
                u.password_hash = $password_hash,
                u.created_at = $created_at
            RETURN u.id AS id
            "#,
        )
        .param("email_lower", user.email.to_lowercase())
        .param("id", user.id.to_string())
        .param("email", user.email.clone())
        .param("name", user.name.clone())
        .param("password_hash", user.password_hash.clone())
        .param("created_at", ts(&user.created_at));

        let mut result = self.graph.execute(q).await?;
        let row = result
            .next()
            .await?
            .ok_or_else(|| anyhow!("User merge returned no row"))?;
        let stored: String = row.get("id")?;
        if stored != user.id.to_string() {
            return Err(StoreError::Conflict(format!("User {} already exists", user.email)).into());
        }
        Ok(())
    }

    pub async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let q = query("MATCH (u:User {id: $id}) RETURN u").param("id", id.to_string());
        self.fetch_one(q, "u", Self::node_to_user).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let q = query("MATCH (u:User {email_lower: $email_lower}) RETURN u")
            .param("email_lower", email.to_lowercase());
        self.fetch_one(q, "u", Self::node_to_user).await
    }

    fn node_to_user(node: &neo4rs::Node) -> Result<User> {
        Ok(User {
            id: node.get::<String>("id")?.parse()?,
            email: node.get("email")?,
            name: node.get("name").unwrap_or_default(),
            password_hash: node.get("password_hash").unwrap_or_default(),
            created_at: parse_ts(&node.get::<String>("created_at")?)?,
        })
    }

    // ========================================================================
    // Project operations
    // ========================================================================

    pub async fn create_project(&self, project: &Project) -> Result<()> {
        let q = query(
            r#"
            CREATE (p:Project {
                id: $id,
                user_id: $user_id,
                name: $name,
                description: $description,
                status: $status,
                target_date: $target_date,
                created_at: $created_at,
                updated_at: $updated_at
            })
            "#,
        );
        self.graph.run(Self::bind_project(q, project)).await?;
        Ok(())
    }

    pub async fn get_project(&self, user_id: Uuid, id: Uuid) -> Result<Option<Project>> {
        let q = query("MATCH (p:Project {id: $id, user_id: $user_id}) RETURN p")
            .param("id", id.to_string())
            .param("user_id", user_id.to_string());
        self.fetch_one(q, "p", Self::node_to_project).await
    }

    pub async fn list_projects(&self, user_id: Uuid) -> Result<Vec<Counted<Project>>> {
        let q = query(
            r#"
            MATCH (p:Project {user_id: $user_id})
            OPTIONAL MATCH (n:Note)
            WHERE n.user_id = $user_id AND n.project_id = p.id
            RETURN p, count(n) AS note_count
            ORDER BY p.updated_at DESC
            "#,
        )
        .param("user_id", user_id.to_string());

        let mut result = self.graph.execute(q).await?;
        let mut projects = Vec::new();
        while let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("p")?;
            projects.push(Counted {
                item: Self::node_to_project(&node)?,
                note_count: row.get::<i64>("note_count")? as usize,
            });
        }
        Ok(projects)
    }

    pub async fn update_project(&self, project: &Project) -> Result<bool> {
        let q = query(
            r#"
            MATCH (p:Project {id: $id, user_id: $user_id})
            SET p.name = $name,
                p.description = $description,
                p.status = $status,
                p.target_date = $target_date,
                p.updated_at = $updated_at
            RETURN count(p) AS updated
            "#,
        );
        self.count_query(Self::bind_project(q, project), "updated")
            .await
            .map(|n| n > 0)
    }

    pub async fn delete_project(&self, user_id: Uuid, id: Uuid) -> Result<bool> {
        let q = query(
            r#"
            MATCH (p:Project {id: $id, user_id: $user_id})
            OPTIONAL MATCH (n:Note {user_id: $user_id, project_id: $id})
            SET n.project_id = ''
            WITH p, count(n) AS orphaned
            DETACH DELETE p
            RETURN orphaned
            "#,
        )
        .param("id", id.to_string())
        .param("user_id", user_id.to_string());

        let mut result = self.graph.execute(q).await?;
        Ok(result.next().await?.is_some())
    }

    fn bind_project(q: Query, project: &Project) -> Query {
        q.param("id", project.id.to_string())
            .param("user_id", project.user_id.to_string())
            .param("name", project.name.clone())
            .param(
                "description",
                project.description.clone().unwrap_or_default(),
            )
            .param("status", project.status.clone())
            .param(
                "target_date",
                project
                    .target_date
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
            )
            .param("created_at", ts(&project.created_at))
            .param("updated_at", ts(&project.updated_at))
    }

    fn node_to_project(node: &neo4rs::Node) -> Result<Project> {
        Ok(Project {
            id: node.get::<String>("id")?.parse()?,
            user_id: node.get::<String>("user_id")?.parse()?,
            name: node.get("name")?,
            description: non_empty(node.get("description").ok()),
            status: node
                .get("status")
                .unwrap_or_else(|_| crate::para::DEFAULT_PROJECT_STATUS.to_string()),
            target_date: non_empty(node.get("target_date").ok())
                .and_then(|s| s.parse::<NaiveDate>().ok()),
            created_at: parse_ts(&node.get::<String>("created_at")?)?,
            updated_at: parse_ts(&node.get::<String>("updated_at")?)?,
        })
    }

    // ========================================================================
    // Area / Resource operations
    // ========================================================================

    pub async fn create_collection(&self, collection: &Collection) -> Result<()> {
        let cypher = format!(
            r#"
            CREATE (c:{} {{
                id: $id,
                user_id: $user_id,
                name: $name,
                description: $description,
                created_at: $created_at,
                updated_at: $updated_at
            }})
            "#,
            collection.kind.label()
        );
        self.graph
            .run(Self::bind_collection(query(&cypher), collection))
            .await?;
        Ok(())
    }

    pub async fn get_collection(
        &self,
        user_id: Uuid,
        kind: CollectionKind,
        id: Uuid,
    ) -> Result<Option<Collection>> {
        let cypher = format!(
            "MATCH (c:{} {{id: $id, user_id: $user_id}}) RETURN c",
            kind.label()
        );
        let q = query(&cypher)
            .param("id", id.to_string())
            .param("user_id", user_id.to_string());
        self.fetch_one(q, "c", |node| Self::node_to_collection(node, kind))
            .await
    }

    pub async fn list_collections(
        &self,
        user_id: Uuid,
        kind: CollectionKind,
    ) -> Result<Vec<Counted<Collection>>> {
        let field = parent_field(&ParaRef::collection(kind, Uuid::nil()));
        let cypher = format!(
            r#"
            MATCH (c:{label} {{user_id: $user_id}})
            OPTIONAL MATCH (n:Note)
            WHERE n.user_id = $user_id AND n.{field} = c.id
            RETURN c, count(n) AS note_count
            ORDER BY c.updated_at DESC
            "#,
            label = kind.label(),
            field = field
        );
        let q = query(&cypher).param("user_id", user_id.to_string());

        let mut result = self.graph.execute(q).await?;
        let mut collections = Vec::new();
        while let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("c")?;
            collections.push(Counted {
                item: Self::node_to_collection(&node, kind)?,
                note_count: row.get::<i64>("note_count")? as usize,
            });
        }
        Ok(collections)
    }

    pub async fn update_collection(&self, collection: &Collection) -> Result<bool> {
        let cypher = format!(
            r#"
            MATCH (c:{} {{id: $id, user_id: $user_id}})
            SET c.name = $name,
                c.description = $description,
                c.updated_at = $updated_at
            RETURN count(c) AS updated
            "#,
            collection.kind.label()
        );
        self.count_query(Self::bind_collection(query(&cypher), collection), "updated")
            .await
            .map(|n| n > 0)
    }

    pub async fn delete_collection(
        &self,
        user_id: Uuid,
        kind: CollectionKind,
        id: Uuid,
    ) -> Result<bool> {
        let field = parent_field(&ParaRef::collection(kind, id));
        let cypher = format!(
            r#"
            MATCH (c:{label} {{id: $id, user_id: $user_id}})
            OPTIONAL MATCH (n:Note {{user_id: $user_id, {field}: $id}})
            SET n.{field} = ''
            WITH c, count(n) AS orphaned
            DETACH DELETE c
            RETURN orphaned
            "#,
            label = kind.label(),
            field = field
        );
        let q = query(&cypher)
            .param("id", id.to_string())
            .param("user_id", user_id.to_string());

        let mut result = self.graph.execute(q).await?;
        Ok(result.next().await?.is_some())
    }

    pub async fn count_notes_under(&self, user_id: Uuid, parent: ParaRef) -> Result<usize> {
        let cypher = format!(
            "MATCH (n:Note {{user_id: $user_id, {}: $id}}) RETURN count(n) AS count",
            parent_field(&parent)
        );
        let q = query(&cypher)
            .param("user_id", user_id.to_string())
            .param("id", parent.id().to_string());
        self.count_query(q, "count").await
    }

    fn bind_collection(q: Query, collection: &Collection) -> Query {
        q.param("id", collection.id.to_string())
            .param("user_id", collection.user_id.to_string())
            .param("name", collection.name.clone())
            .param(
                "description",
                collection.description.clone().unwrap_or_default(),
            )
            .param("created_at", ts(&collection.created_at))
            .param("updated_at", ts(&collection.updated_at))
    }

    fn node_to_collection(node: &neo4rs::Node, kind: CollectionKind) -> Result<Collection> {
        Ok(Collection {
            id: node.get::<String>("id")?.parse()?,
            user_id: node.get::<String>("user_id")?.parse()?,
            kind,
            name: node.get("name")?,
            description: non_empty(node.get("description").ok()),
            created_at: parse_ts(&node.get::<String>("created_at")?)?,
            updated_at: parse_ts(&node.get::<String>("updated_at")?)?,
        })
    }

    // ========================================================================
    // Note operations
    // ========================================================================

    pub async fn create_note(&self, note: &Note) -> Result<()> {
        let q = query(
            r#"
            CREATE (n:Note {
                id: $id,
                user_id: $user_id,
                title: $title,
                content: $content,
                tags: $tags,
                source: $source,
                project_id: $project_id,
                area_id: $area_id,
                resource_id: $resource_id,
                created_at: $created_at,
                updated_at: $updated_at
            })
            "#,
        );
        self.graph.run(Self::bind_note(q, note)).await?;
        Ok(())
    }

    pub async fn get_note(&self, user_id: Uuid, id: Uuid) -> Result<Option<Note>> {
        let q = query("MATCH (n:Note {id: $id, user_id: $user_id}) RETURN n")
            .param("id", id.to_string())
            .param("user_id", user_id.to_string());
        self.fetch_one(q, "n", Self::node_to_note).await
    }

    pub async fn list_notes(
        &self,
        user_id: Uuid,
        filters: &NoteFilters,
    ) -> Result<Vec<NoteWithCounts>> {
        let filter = NoteWhere::from_filters(filters);
        let limit = filters
            .limit
            .map(|l| format!("LIMIT {}", l))
            .unwrap_or_default();
        let cypher = format!(
            r#"
            MATCH (n:Note)
            WHERE n.user_id = $user_id {}
            RETURN n,
                size([(n)-[:CONNECTS]->() | 1]) AS as_source,
                size([(n)<-[:CONNECTS]-() | 1]) AS as_target
            ORDER BY n.created_at DESC
            {}
            "#,
            filter.clause(),
            limit
        );
        let q = filter.bind(query(&cypher).param("user_id", user_id.to_string()));

        let mut result = self.graph.execute(q).await?;
        let mut notes = Vec::new();
        while let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("n")?;
            notes.push(NoteWithCounts {
                note: Self::node_to_note(&node)?,
                counts: ConnectionCounts {
                    as_source: row.get::<i64>("as_source")? as usize,
                    as_target: row.get::<i64>("as_target")? as usize,
                },
            });
        }
        Ok(notes)
    }

    pub async fn update_note(&self, note: &Note) -> Result<bool> {
        let q = query(
            r#"
            MATCH (n:Note {id: $id, user_id: $user_id})
            SET n.title = $title,
                n.content = $content,
                n.tags = $tags,
                n.source = $source,
                n.project_id = $project_id,
                n.area_id = $area_id,
                n.resource_id = $resource_id,
                n.updated_at = $updated_at
            RETURN count(n) AS updated
            "#,
        );
        self.count_query(Self::bind_note(q, note), "updated")
            .await
            .map(|n| n > 0)
    }

    pub async fn delete_note(&self, user_id: Uuid, id: Uuid) -> Result<bool> {
        let q = query(
            r#"
            MATCH (n:Note {id: $id, user_id: $user_id})
            DETACH DELETE n
            RETURN count(*) AS deleted
            "#,
        )
        .param("id", id.to_string())
        .param("user_id", user_id.to_string());
        self.count_query(q, "deleted").await.map(|n| n > 0)
    }

    fn bind_note(q: Query, note: &Note) -> Query {
        let id_or_empty = |id: Option<Uuid>| id.map(|u| u.to_string()).unwrap_or_default();
        q.param("id", note.id.to_string())
            .param("user_id", note.user_id.to_string())
            .param("title", note.title.clone())
            .param("content", note.content.clone())
            .param(
                "tags",
                note.tags.iter().map(|t| t.to_string()).collect::<Vec<_>>(),
            )
            .param("source", note.source.to_string())
            .param("project_id", id_or_empty(note.project_id()))
            .param("area_id", id_or_empty(note.area_id()))
            .param("resource_id", id_or_empty(note.resource_id()))
            .param("created_at", ts(&note.created_at))
            .param("updated_at", ts(&note.updated_at))
    }

    fn node_to_note(node: &neo4rs::Node) -> Result<Note> {
        let parent = parse_uuid(node.get("project_id").ok())
            .map(ParaRef::Project)
            .or_else(|| parse_uuid(node.get("area_id").ok()).map(ParaRef::Area))
            .or_else(|| parse_uuid(node.get("resource_id").ok()).map(ParaRef::Resource));

        let tags: Vec<String> = node.get("tags").unwrap_or_else(|_| vec![]);

        Ok(Note {
            id: node.get::<String>("id")?.parse()?,
            user_id: node.get::<String>("user_id")?.parse()?,
            title: node.get("title")?,
            content: node.get("content").unwrap_or_default(),
            tags: tags.iter().filter_map(|t| t.parse().ok()).collect(),
            source: node
                .get::<String>("source")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(NoteSource::Manual),
            parent,
            created_at: parse_ts(&node.get::<String>("created_at")?)?,
            updated_at: parse_ts(&node.get::<String>("updated_at")?)?,
        })
    }

    // ========================================================================
    // Connection operations
    // ========================================================================

    pub async fn create_connection(&self, connection: &Connection) -> Result<()> {
        let q = query(
            r#"
            MATCH (s:Note {id: $source_id}), (t:Note {id: $target_id})
            MERGE (s)-[c:CONNECTS]->(t)
            ON CREATE SET
                c.id = $id,
                c.strength = $strength,
                c.created_at = $created_at
            RETURN c.id AS id
            "#,
        )
        .param("source_id", connection.source_note_id.to_string())
        .param("target_id", connection.target_note_id.to_string())
        .param("id", connection.id.to_string())
        .param("strength", connection.strength)
        .param("created_at", ts(&connection.created_at));

        let mut result = self.graph.execute(q).await?;
        let row = result
            .next()
            .await?
            .ok_or_else(|| anyhow!("Connection endpoints not found"))?;
        let stored: String = row.get("id")?;
        if stored != connection.id.to_string() {
            return Err(StoreError::Conflict("Connection already exists".to_string()).into());
        }
        Ok(())
    }

    pub async fn get_connection_by_pair(
        &self,
        source_note_id: Uuid,
        target_note_id: Uuid,
    ) -> Result<Option<Connection>> {
        let q = query(
            r#"
            MATCH (:Note {id: $source_id})-[c:CONNECTS]->(:Note {id: $target_id})
            RETURN c.id AS id, c.strength AS strength, c.created_at AS created_at
            "#,
        )
        .param("source_id", source_note_id.to_string())
        .param("target_id", target_note_id.to_string());

        let mut result = self.graph.execute(q).await?;
        match result.next().await? {
            Some(row) => Ok(Some(Self::row_to_connection(
                &row,
                source_note_id,
                target_note_id,
            )?)),
            None => Ok(None),
        }
    }

    pub async fn list_outgoing(
        &self,
        user_id: Uuid,
        note_id: Uuid,
    ) -> Result<Vec<(Connection, Note)>> {
        let q = query(
            r#"
            MATCH (n:Note {id: $note_id, user_id: $user_id})-[c:CONNECTS]->(other:Note)
            RETURN c.id AS id, c.strength AS strength, c.created_at AS created_at, other
            ORDER BY c.created_at DESC
            "#,
        )
        .param("note_id", note_id.to_string())
        .param("user_id", user_id.to_string());

        let mut result = self.graph.execute(q).await?;
        let mut edges = Vec::new();
        while let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("other")?;
            let other = Self::node_to_note(&node)?;
            edges.push((Self::row_to_connection(&row, note_id, other.id)?, other));
        }
        Ok(edges)
    }

    pub async fn list_incoming(
        &self,
        user_id: Uuid,
        note_id: Uuid,
    ) -> Result<Vec<(Connection, Note)>> {
        let q = query(
            r#"
            MATCH (n:Note {id: $note_id, user_id: $user_id})<-[c:CONNECTS]-(other:Note)
            RETURN c.id AS id, c.strength AS strength, c.created_at AS created_at, other
            ORDER BY c.created_at DESC
            "#,
        )
        .param("note_id", note_id.to_string())
        .param("user_id", user_id.to_string());

        let mut result = self.graph.execute(q).await?;
        let mut edges = Vec::new();
        while let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("other")?;
            let other = Self::node_to_note(&node)?;
            edges.push((Self::row_to_connection(&row, other.id, note_id)?, other));
        }
        Ok(edges)
    }

    pub async fn delete_connection(&self, user_id: Uuid, id: Uuid) -> Result<bool> {
        let q = query(
            r#"
            MATCH (:Note {user_id: $user_id})-[c:CONNECTS {id: $id}]->()
            DELETE c
            RETURN count(*) AS deleted
            "#,
        )
        .param("id", id.to_string())
        .param("user_id", user_id.to_string());
        self.count_query(q, "deleted").await.map(|n| n > 0)
    }

    fn row_to_connection(row: &neo4rs::Row, source: Uuid, target: Uuid) -> Result<Connection> {
        Ok(Connection {
            id: row.get::<String>("id")?.parse()?,
            source_note_id: source,
            target_note_id: target,
            strength: row.get("strength")?,
            created_at: parse_ts(&row.get::<String>("created_at")?)?,
        })
    }

    // ========================================================================
    // Daily prompt operations
    // ========================================================================

    pub async fn get_daily_prompt(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<DailyPrompt>> {
        let q = query("MATCH (d:DailyPrompt {key: $key}) RETURN d")
            .param("key", DailyPrompt::day_key(user_id, date));
        self.fetch_one(q, "d", Self::node_to_daily_prompt).await
    }

    pub async fn get_or_create_daily_prompt(&self, prompt: &DailyPrompt) -> Result<DailyPrompt> {
        let q = query(
            r#"
            MERGE (d:DailyPrompt {key: $key})
            ON CREATE SET
                d.id = $id,
                d.user_id = $user_id,
                d.date = $date,
                d.question = $question,
                d.response = $response,
                d.completed = $completed,
                d.created_at = $created_at,
                d.updated_at = $updated_at
            RETURN d
            "#,
        );
        self.fetch_one(Self::bind_daily_prompt(q, prompt), "d", Self::node_to_daily_prompt)
            .await?
            .ok_or_else(|| anyhow!("Daily prompt merge returned no row"))
    }

    pub async fn upsert_daily_response(&self, prompt: &DailyPrompt) -> Result<DailyPrompt> {
        let q = query(
            r#"
            MERGE (d:DailyPrompt {key: $key})
            ON CREATE SET
                d.id = $id,
                d.user_id = $user_id,
                d.date = $date,
                d.question = $question,
                d.response = $response,
                d.completed = $completed,
                d.created_at = $created_at,
                d.updated_at = $updated_at
            ON MATCH SET
                d.response = $response,
                d.completed = true,
                d.updated_at = $now
            RETURN d
            "#,
        )
        .param("now", ts(&Utc::now()));
        self.fetch_one(Self::bind_daily_prompt(q, prompt), "d", Self::node_to_daily_prompt)
            .await?
            .ok_or_else(|| anyhow!("Daily prompt merge returned no row"))
    }

    pub async fn list_daily_prompts(
        &self,
        user_id: Uuid,
        limit: Option<usize>,
    ) -> Result<Vec<DailyPrompt>> {
        let cypher = format!(
            "MATCH (d:DailyPrompt {{user_id: $user_id}}) RETURN d ORDER BY d.date DESC {}",
            limit.map(|l| format!("LIMIT {}", l)).unwrap_or_default()
        );
        let q = query(&cypher).param("user_id", user_id.to_string());

        let mut result = self.graph.execute(q).await?;
        let mut prompts = Vec::new();
        while let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("d")?;
            prompts.push(Self::node_to_daily_prompt(&node)?);
        }
        Ok(prompts)
    }

    fn bind_daily_prompt(q: Query, prompt: &DailyPrompt) -> Query {
        q.param("key", DailyPrompt::day_key(prompt.user_id, prompt.date))
            .param("id", prompt.id.to_string())
            .param("user_id", prompt.user_id.to_string())
            .param("date", prompt.date.to_string())
            .param("question", prompt.question.clone())
            .param("response", prompt.response.clone().unwrap_or_default())
            .param("completed", prompt.completed)
            .param("created_at", ts(&prompt.created_at))
            .param("updated_at", ts(&prompt.updated_at))
    }

    fn node_to_daily_prompt(node: &neo4rs::Node) -> Result<DailyPrompt> {
        Ok(DailyPrompt {
            id: node.get::<String>("id")?.parse()?,
            user_id: node.get::<String>("user_id")?.parse()?,
            date: node.get::<String>("date")?.parse()?,
            question: node.get("question")?,
            response: non_empty(node.get("response").ok()),
            completed: node.get("completed").unwrap_or(false),
            created_at: parse_ts(&node.get::<String>("created_at")?)?,
            updated_at: parse_ts(&node.get::<String>("updated_at")?)?,
        })
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    async fn fetch_one<T>(
        &self,
        q: Query,
        column: &str,
        convert: impl Fn(&neo4rs::Node) -> Result<T>,
    ) -> Result<Option<T>> {
        let mut result = self.graph.execute(q).await?;
        match result.next().await? {
            Some(row) => {
                let node: neo4rs::Node = row.get(column)?;
                Ok(Some(convert(&node)?))
            }
            None => Ok(None),
        }
    }

    async fn count_query(&self, q: Query, column: &str) -> Result<usize> {
        let mut result = self.graph.execute(q).await?;
        match result.next().await? {
            Some(row) => Ok(row.get::<i64>(column)?.max(0) as usize),
            None => Ok(0),
        }
    }
}
