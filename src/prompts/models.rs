//! Daily prompt models and DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One reflection question/response per user per calendar day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyPrompt {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub question: String,
    pub response: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DailyPrompt {
    /// A fresh, unanswered prompt
    pub fn new(user_id: Uuid, date: NaiveDate, question: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            date,
            question,
            response: None,
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Store key enforcing one prompt per user per day
    pub fn day_key(user_id: Uuid, date: NaiveDate) -> String {
        format!("{}:{}", user_id, date)
    }
}

/// Body of `POST /api/daily-prompts`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordResponseRequest {
    #[serde(default)]
    pub response: String,
    /// Question shown to the user; only used when the day's prompt does not exist yet
    pub question: Option<String>,
    /// Defaults to today (UTC)
    pub date: Option<NaiveDate>,
}
