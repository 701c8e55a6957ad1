//! Query parameter structs for list and lookup endpoints

use crate::notes::{NoteFilters, NoteTag};
use crate::para::ParaBucket;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::str::FromStr;

/// Upper bound for `limit` parameters
pub const MAX_LIMIT: usize = 500;

/// Helper to deserialize optional values from the query string (which are always strings)
fn deserialize_option_from_str<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    use serde::de::Error;
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if !s.trim().is_empty() => s.trim().parse().map(Some).map_err(D::Error::custom),
        _ => Ok(None),
    }
}

/// Split a comma-separated parameter, dropping blanks
fn split_csv(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// `GET /api/notes` parameters
#[derive(Debug, Deserialize, Default, Clone)]
pub struct NotesListQuery {
    /// `all` (default), `project(s)`, `area(s)`, `resource(s)`, `archive`
    pub bucket: Option<String>,
    /// Comma-separated tags, e.g. `WIN,IDEA`
    pub tags: Option<String>,
    pub search: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_from_str")]
    pub limit: Option<usize>,
}

impl NotesListQuery {
    /// Validate and convert into store filters
    pub fn to_filters(&self) -> Result<NoteFilters, String> {
        let bucket = match self.bucket.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(b) if b.eq_ignore_ascii_case("all") => None,
            Some(b) => Some(b.parse::<ParaBucket>()?),
        };

        let tags = match self.tags.as_deref() {
            Some(raw) => {
                let parsed = split_csv(raw)
                    .map(NoteTag::from_str)
                    .collect::<Result<Vec<_>, _>>()?;
                (!parsed.is_empty()).then_some(parsed)
            }
            None => None,
        };

        let search = self
            .search
            .as_ref()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(NoteFilters {
            bucket,
            tags,
            search,
            limit: self.limit.map(|l| l.min(MAX_LIMIT)),
        })
    }
}

/// `GET /api/daily-prompts` parameters
#[derive(Debug, Deserialize, Default, Clone)]
pub struct DatePromptQuery {
    /// `YYYY-MM-DD`; defaults to today (UTC)
    #[serde(default, deserialize_with = "deserialize_option_from_str")]
    pub date: Option<NaiveDate>,
}

/// `GET /api/daily-prompts/history` parameters
#[derive(Debug, Deserialize, Default, Clone)]
pub struct HistoryQuery {
    #[serde(default, deserialize_with = "deserialize_option_from_str")]
    pub limit: Option<usize>,
}

impl HistoryQuery {
    pub fn validated_limit(&self) -> Option<usize> {
        self.limit.map(|l| l.min(MAX_LIMIT))
    }
}
