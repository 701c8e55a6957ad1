//! PARA container models: Projects, Areas and Resources.
//!
//! Areas and Resources share one shape and are both represented by
//! [`Collection`], distinguished by [`CollectionKind`]. Projects carry a
//! status and an optional target date on top of that.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Default status given to new projects
pub const DEFAULT_PROJECT_STATUS: &str = "active";

// ============================================================================
// Enums
// ============================================================================

/// Which kind of non-project PARA container a [`Collection`] is
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    Area,
    Resource,
}

impl CollectionKind {
    /// Neo4j label for nodes of this kind
    pub fn label(&self) -> &'static str {
        match self {
            Self::Area => "Area",
            Self::Resource => "Resource",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Area => write!(f, "area"),
            Self::Resource => write!(f, "resource"),
        }
    }
}

impl FromStr for CollectionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "area" => Ok(Self::Area),
            "resource" => Ok(Self::Resource),
            _ => Err(format!("Unknown collection kind: {}", s)),
        }
    }
}

/// Reference to the single PARA parent a note is filed under
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ParaRef {
    Project(Uuid),
    Area(Uuid),
    Resource(Uuid),
}

impl ParaRef {
    pub fn id(&self) -> Uuid {
        match self {
            Self::Project(id) | Self::Area(id) | Self::Resource(id) => *id,
        }
    }

    pub fn bucket(&self) -> ParaBucket {
        match self {
            Self::Project(_) => ParaBucket::Project,
            Self::Area(_) => ParaBucket::Area,
            Self::Resource(_) => ParaBucket::Resource,
        }
    }

    /// Build a reference to a collection of the given kind
    pub fn collection(kind: CollectionKind, id: Uuid) -> Self {
        match kind {
            CollectionKind::Area => Self::Area(id),
            CollectionKind::Resource => Self::Resource(id),
        }
    }
}

/// PARA category a note falls into. `Archive` is implicit: no parent set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ParaBucket {
    Project,
    Area,
    Resource,
    Archive,
}

impl ParaBucket {
    pub fn of(parent: Option<&ParaRef>) -> Self {
        parent.map(ParaRef::bucket).unwrap_or(Self::Archive)
    }
}

impl fmt::Display for ParaBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Project => write!(f, "project"),
            Self::Area => write!(f, "area"),
            Self::Resource => write!(f, "resource"),
            Self::Archive => write!(f, "archive"),
        }
    }
}

impl FromStr for ParaBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "project" | "projects" => Ok(Self::Project),
            "area" | "areas" => Ok(Self::Area),
            "resource" | "resources" => Ok(Self::Resource),
            "archive" | "none" => Ok(Self::Archive),
            _ => Err(format!("Unknown PARA bucket: {}", s)),
        }
    }
}

// ============================================================================
// Entities
// ============================================================================

/// A time-bound effort with a goal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub target_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(user_id: Uuid, name: String, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            description,
            status: DEFAULT_PROJECT_STATUS.to_string(),
            target_date: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// An Area (ongoing responsibility) or a Resource (reference topic)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Collection {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: CollectionKind,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Collection {
    pub fn new(
        user_id: Uuid,
        kind: CollectionKind,
        name: String,
        description: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            kind,
            name,
            description,
            created_at: now,
            updated_at: now,
        }
    }
}

/// An entity paired with the number of notes filed under it
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Counted<T> {
    #[serde(flatten)]
    pub item: T,
    pub note_count: usize,
}

// ============================================================================
// Requests
// ============================================================================

/// Deserialize a present field (even `null`) as `Some(..)`.
///
/// Combined with `#[serde(default)]` this yields the tri-state used by
/// partial updates: absent → `None`, `null` → `Some(None)`, value → `Some(Some(v))`.
pub fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Request to create an Area or a Resource
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCollectionRequest {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
}

/// Request to create a Project
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectRequest {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub target_date: Option<NaiveDate>,
}

/// Partial update of an Area or a Resource
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCollectionRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
}

/// Partial update of a Project
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub target_date: Option<Option<NaiveDate>>,
}
