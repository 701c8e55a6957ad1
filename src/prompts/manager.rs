//! Prompt Manager - daily reflection prompts
//!
//! One prompt per user per calendar day: created lazily on first access with
//! the question for that date, then answered in place.

use super::models::*;
use super::selector::select_prompt;
use crate::error::{optional_trimmed, required_trimmed, VaultResult};
use crate::notes::{Note, NoteSource, NoteTag};
use crate::store::VaultStore;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Manager for daily prompts
pub struct PromptManager {
    store: Arc<dyn VaultStore>,
    /// Whether answered prompts are copied into a JOURNAL note
    promote_to_note: bool,
}

impl PromptManager {
    pub fn new(store: Arc<dyn VaultStore>, promote_to_note: bool) -> Self {
        Self {
            store,
            promote_to_note,
        }
    }

    /// Current calendar day in UTC
    pub fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    /// The caller's prompt for `date`, creating it unanswered if needed
    pub async fn get_or_create(&self, user_id: Uuid, date: NaiveDate) -> VaultResult<DailyPrompt> {
        if let Some(existing) = self.store.get_daily_prompt(user_id, date).await? {
            return Ok(existing);
        }
        let fresh = DailyPrompt::new(user_id, date, select_prompt(date).to_string());
        let stored = self.store.get_or_create_daily_prompt(&fresh).await?;
        if stored.id == fresh.id {
            tracing::debug!(user_id = %user_id, date = %date, "Daily prompt created");
        }
        Ok(stored)
    }

    /// Record the caller's answer for a day.
    ///
    /// An existing prompt keeps its question; otherwise the client's question
    /// (or the day's rotation question) is stored along with the answer.
    pub async fn record_response(
        &self,
        user_id: Uuid,
        req: RecordResponseRequest,
    ) -> VaultResult<DailyPrompt> {
        let response = required_trimmed(&req.response, "Response")?;
        let date = req.date.unwrap_or_else(Self::today);
        let question =
            optional_trimmed(req.question).unwrap_or_else(|| select_prompt(date).to_string());

        let mut answered = DailyPrompt::new(user_id, date, question);
        answered.response = Some(response);
        answered.completed = true;

        let stored = self.store.upsert_daily_response(&answered).await?;
        tracing::info!(user_id = %user_id, date = %date, "Daily prompt answered");
        Ok(stored)
    }

    /// Copy an answered prompt into a JOURNAL note titled `Daily: <question>`.
    ///
    /// Returns `None` when promotion is disabled or the prompt has no response.
    pub async fn promote_reflection(&self, prompt: &DailyPrompt) -> VaultResult<Option<Note>> {
        if !self.promote_to_note {
            return Ok(None);
        }
        let Some(ref response) = prompt.response else {
            return Ok(None);
        };

        let mut note = Note::new(
            prompt.user_id,
            format!("Daily: {}", prompt.question),
            response.clone(),
        );
        note.tags = vec![NoteTag::Note];
        note.source = NoteSource::Journal;

        self.store.create_note(&note).await?;
        tracing::debug!(user_id = %prompt.user_id, note_id = %note.id, "Reflection promoted to note");
        Ok(Some(note))
    }

    /// The caller's prompts, newest first
    pub async fn history(&self, user_id: Uuid, limit: Option<usize>) -> VaultResult<Vec<DailyPrompt>> {
        Ok(self.store.list_daily_prompts(user_id, limit).await?)
    }
}
