//! Note models and DTOs
//!
//! A note is a free-form titled text with a set of tags, an origin (`source`)
//! and at most one PARA parent. Notes link to each other through directed,
//! weighted [`Connection`]s.

use crate::para::{present, Collection, ParaBucket, ParaRef, Project};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Strength given to connections created without one
pub const DEFAULT_CONNECTION_STRENGTH: i64 = 1;

// ============================================================================
// Core Enums
// ============================================================================

/// Fixed vocabulary of note tags
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoteTag {
    /// A choice that was made
    Decision,
    /// Something that slowed you down
    Friction,
    Win,
    Idea,
    Question,
    /// Unfinished business
    OpenLoop,
    Note,
    Mood,
}

impl NoteTag {
    pub const ALL: [NoteTag; 8] = [
        Self::Decision,
        Self::Friction,
        Self::Win,
        Self::Idea,
        Self::Question,
        Self::OpenLoop,
        Self::Note,
        Self::Mood,
    ];
}

impl fmt::Display for NoteTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decision => write!(f, "DECISION"),
            Self::Friction => write!(f, "FRICTION"),
            Self::Win => write!(f, "WIN"),
            Self::Idea => write!(f, "IDEA"),
            Self::Question => write!(f, "QUESTION"),
            Self::OpenLoop => write!(f, "OPEN_LOOP"),
            Self::Note => write!(f, "NOTE"),
            Self::Mood => write!(f, "MOOD"),
        }
    }
}

impl FromStr for NoteTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DECISION" => Ok(Self::Decision),
            "FRICTION" => Ok(Self::Friction),
            "WIN" => Ok(Self::Win),
            "IDEA" => Ok(Self::Idea),
            "QUESTION" => Ok(Self::Question),
            "OPEN_LOOP" => Ok(Self::OpenLoop),
            "NOTE" => Ok(Self::Note),
            "MOOD" => Ok(Self::Mood),
            _ => Err(format!("Unknown note tag: {}", s)),
        }
    }
}

/// Where a note came from
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoteSource {
    /// Written through the regular note form
    #[default]
    Manual,
    /// Quick capture
    Capture,
    /// Promoted from a daily reflection
    Journal,
}

impl fmt::Display for NoteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manual => write!(f, "MANUAL"),
            Self::Capture => write!(f, "CAPTURE"),
            Self::Journal => write!(f, "JOURNAL"),
        }
    }
}

impl FromStr for NoteSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "MANUAL" => Ok(Self::Manual),
            "CAPTURE" => Ok(Self::Capture),
            "JOURNAL" => Ok(Self::Journal),
            _ => Err(format!("Unknown note source: {}", s)),
        }
    }
}

/// Deduplicate tags, keeping the order of first appearance.
pub fn normalize_tags(tags: Vec<NoteTag>) -> Vec<NoteTag> {
    let mut out = Vec::with_capacity(tags.len());
    for tag in tags {
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

// ============================================================================
// Entities
// ============================================================================

/// A note owned by one user.
///
/// Serialized with the parent reference plus `project_id` / `area_id` /
/// `resource_id`, the same fields create and update requests take.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(into = "NoteBody")]
pub struct Note {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub tags: Vec<NoteTag>,
    pub source: NoteSource,
    /// PARA parent; `None` files the note under Archive
    pub parent: Option<ParaRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Create a new unclassified note tagged `NOTE`
    pub fn new(user_id: Uuid, title: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title,
            content,
            tags: vec![NoteTag::Note],
            source: NoteSource::default(),
            parent: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn bucket(&self) -> ParaBucket {
        ParaBucket::of(self.parent.as_ref())
    }

    pub fn project_id(&self) -> Option<Uuid> {
        match self.parent {
            Some(ParaRef::Project(id)) => Some(id),
            _ => None,
        }
    }

    pub fn area_id(&self) -> Option<Uuid> {
        match self.parent {
            Some(ParaRef::Area(id)) => Some(id),
            _ => None,
        }
    }

    pub fn resource_id(&self) -> Option<Uuid> {
        match self.parent {
            Some(ParaRef::Resource(id)) => Some(id),
            _ => None,
        }
    }

    /// Case-insensitive substring match on title or content
    pub fn matches_search(&self, search: &str) -> bool {
        let needle = search.trim().to_lowercase();
        needle.is_empty()
            || self.title.to_lowercase().contains(&needle)
            || self.content.to_lowercase().contains(&needle)
    }
}

/// Wire shape of [`Note`]
#[derive(Serialize)]
struct NoteBody {
    id: Uuid,
    user_id: Uuid,
    title: String,
    content: String,
    tags: Vec<NoteTag>,
    source: NoteSource,
    parent: Option<ParaRef>,
    project_id: Option<Uuid>,
    area_id: Option<Uuid>,
    resource_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<Note> for NoteBody {
    fn from(note: Note) -> Self {
        Self {
            project_id: note.project_id(),
            area_id: note.area_id(),
            resource_id: note.resource_id(),
            id: note.id,
            user_id: note.user_id,
            title: note.title,
            content: note.content,
            tags: note.tags,
            source: note.source,
            parent: note.parent,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

/// Directed, weighted edge between two notes of the same user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Connection {
    pub id: Uuid,
    pub source_note_id: Uuid,
    pub target_note_id: Uuid,
    pub strength: i64,
    pub created_at: DateTime<Utc>,
}

impl Connection {
    pub fn new(source_note_id: Uuid, target_note_id: Uuid, strength: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_note_id,
            target_note_id,
            strength,
            created_at: Utc::now(),
        }
    }
}

// ============================================================================
// Filters
// ============================================================================

/// Filters for listing notes
#[derive(Debug, Clone, Default)]
pub struct NoteFilters {
    /// `None` lists every bucket
    pub bucket: Option<ParaBucket>,
    /// A note matches if it carries any of these tags
    pub tags: Option<Vec<NoteTag>>,
    pub search: Option<String>,
    pub limit: Option<usize>,
}

impl NoteFilters {
    /// Whether a note passes every filter except `limit`
    pub fn matches(&self, note: &Note) -> bool {
        if let Some(bucket) = self.bucket {
            if note.bucket() != bucket {
                return false;
            }
        }
        if let Some(ref tags) = self.tags {
            if !tags.is_empty() && !tags.iter().any(|t| note.tags.contains(t)) {
                return false;
            }
        }
        match self.search {
            Some(ref s) => note.matches_search(s),
            None => true,
        }
    }
}

// ============================================================================
// Requests
// ============================================================================

/// Request to create a note
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateNoteRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    pub tags: Option<Vec<NoteTag>>,
    pub source: Option<NoteSource>,
    pub project_id: Option<Uuid>,
    pub area_id: Option<Uuid>,
    pub resource_id: Option<Uuid>,
}

/// Partial update of a note.
///
/// Classification fields are tri-state: absent leaves the parent alone,
/// `null` clears it, a value re-files the note.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<NoteTag>>,
    #[serde(default, deserialize_with = "present")]
    pub project_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "present")]
    pub area_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "present")]
    pub resource_id: Option<Option<Uuid>>,
}

/// Request to connect two notes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateConnectionRequest {
    pub source_note_id: Option<Uuid>,
    pub target_note_id: Option<Uuid>,
    pub strength: Option<i64>,
}

// ============================================================================
// Views
// ============================================================================

/// Number of connections a note takes part in, per direction
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectionCounts {
    pub as_source: usize,
    pub as_target: usize,
}

impl ConnectionCounts {
    pub fn total(&self) -> usize {
        self.as_source + self.as_target
    }
}

/// A note with its connection counts, as returned by store listings
#[derive(Debug, Clone, PartialEq)]
pub struct NoteWithCounts {
    pub note: Note,
    pub counts: ConnectionCounts,
}

/// The resolved PARA parent of a note
#[derive(Debug, Clone, Default, Serialize)]
pub struct Classification {
    pub project: Option<Project>,
    pub area: Option<Collection>,
    pub resource: Option<Collection>,
}

/// List entry: note, its resolved parent and its connection counts
#[derive(Debug, Clone, Serialize)]
pub struct NoteListItem {
    #[serde(flatten)]
    pub note: Note,
    pub bucket: ParaBucket,
    pub project: Option<Project>,
    pub area: Option<Collection>,
    pub resource: Option<Collection>,
    pub connection_counts: ConnectionCounts,
}

/// Minimal projection of a note used inside connection payloads
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NoteSummary {
    pub id: Uuid,
    pub title: String,
    pub tags: Vec<NoteTag>,
}

impl From<&Note> for NoteSummary {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id,
            title: note.title.clone(),
            tags: note.tags.clone(),
        }
    }
}

/// Outgoing edge with the note it points to
#[derive(Debug, Clone, Serialize)]
pub struct OutgoingConnection {
    #[serde(flatten)]
    pub connection: Connection,
    pub target_note: NoteSummary,
}

/// Incoming edge with the note it comes from
#[derive(Debug, Clone, Serialize)]
pub struct IncomingConnection {
    #[serde(flatten)]
    pub connection: Connection,
    pub source_note: NoteSummary,
}

/// Full note view: parent plus both directions of connections
#[derive(Debug, Clone, Serialize)]
pub struct NoteDetails {
    #[serde(flatten)]
    pub note: Note,
    pub bucket: ParaBucket,
    pub project: Option<Project>,
    pub area: Option<Collection>,
    pub resource: Option<Collection>,
    pub connections_as_source: Vec<OutgoingConnection>,
    pub connections_as_target: Vec<IncomingConnection>,
}

/// `{id, title}` of a note at one end of a new connection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NoteRef {
    pub id: Uuid,
    pub title: String,
}

/// A freshly created connection with both endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionWithNotes {
    #[serde(flatten)]
    pub connection: Connection,
    pub source_note: NoteRef,
    pub target_note: NoteRef,
}

/// Dashboard totals for one user
#[derive(Debug, Clone, Serialize)]
pub struct ReviewSummary {
    pub total_notes: usize,
    pub notes_this_week: usize,
    /// Sum of per-note connection counts (each edge counted at both ends)
    pub connections: usize,
    pub recent: Vec<NoteListItem>,
}
