//! Daily prompt API handlers

use super::extract::{ApiJson, ApiQuery};
use super::handlers::{AppError, VaultState};
use super::query::{DatePromptQuery, HistoryQuery};
use crate::auth::extractor::AuthUser;
use crate::prompts::{DailyPrompt, PromptManager, RecordResponseRequest};
use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

/// Get (or lazily create) the caller's prompt for a day
pub async fn get_daily_prompt(
    State(state): State<VaultState>,
    user: AuthUser,
    ApiQuery(query): ApiQuery<DatePromptQuery>,
) -> Result<Json<DailyPrompt>, AppError> {
    let date = query.date.unwrap_or_else(PromptManager::today);
    Ok(Json(state.prompts.get_or_create(user.user_id, date).await?))
}

/// Record the caller's response, then promote it to a journal note
pub async fn record_response(
    State(state): State<VaultState>,
    user: AuthUser,
    ApiJson(req): ApiJson<RecordResponseRequest>,
) -> Result<(StatusCode, Json<DailyPrompt>), AppError> {
    let prompt = state.prompts.record_response(user.user_id, req).await?;

    if let Err(e) = state.prompts.promote_reflection(&prompt).await {
        tracing::error!(
            user_id = %user.user_id,
            prompt_id = %prompt.id,
            "Failed to promote reflection: {}",
            e
        );
        return Err(e.into());
    }

    Ok((StatusCode::CREATED, Json(prompt)))
}

/// The caller's prompts, newest first
pub async fn prompt_history(
    State(state): State<VaultState>,
    user: AuthUser,
    ApiQuery(query): ApiQuery<HistoryQuery>,
) -> Result<Json<Vec<DailyPrompt>>, AppError> {
    Ok(Json(
        state
            .prompts
            .history(user.user_id, query.validated_limit())
            .await?,
    ))
}
