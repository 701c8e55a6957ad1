//! Note, connection and review API handlers

use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::handlers::{AppError, SuccessResponse, VaultState};
use super::query::NotesListQuery;
use crate::auth::extractor::AuthUser;
use crate::notes::{
    ConnectionWithNotes, CreateConnectionRequest, CreateNoteRequest, Note, NoteDetails,
    NoteListItem, ReviewSummary, UpdateNoteRequest,
};
use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use uuid::Uuid;

// ============================================================================
// Notes
// ============================================================================

/// List notes with optional bucket, tag and search filters
pub async fn list_notes(
    State(state): State<VaultState>,
    user: AuthUser,
    ApiQuery(query): ApiQuery<NotesListQuery>,
) -> Result<Json<Vec<NoteListItem>>, AppError> {
    let filters = query.to_filters().map_err(AppError::BadRequest)?;
    Ok(Json(state.notes.list_notes(user.user_id, &filters).await?))
}

/// Create a new note
pub async fn create_note(
    State(state): State<VaultState>,
    user: AuthUser,
    ApiJson(req): ApiJson<CreateNoteRequest>,
) -> Result<(StatusCode, Json<Note>), AppError> {
    let note = state.notes.create_note(user.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// Get a note with its parent and connections
pub async fn get_note(
    State(state): State<VaultState>,
    user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<NoteDetails>, AppError> {
    Ok(Json(state.notes.get_note(user.user_id, id).await?))
}

/// Update a note; returns it with its resolved parent and connection counts
pub async fn update_note(
    State(state): State<VaultState>,
    user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateNoteRequest>,
) -> Result<Json<NoteListItem>, AppError> {
    Ok(Json(state.notes.update_note(user.user_id, id, req).await?))
}

/// Delete a note and its connections
pub async fn delete_note(
    State(state): State<VaultState>,
    user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.notes.delete_note(user.user_id, id).await?;
    Ok(SuccessResponse::ok())
}

// ============================================================================
// Connections
// ============================================================================

/// Connect two of the caller's notes
pub async fn create_connection(
    State(state): State<VaultState>,
    user: AuthUser,
    ApiJson(req): ApiJson<CreateConnectionRequest>,
) -> Result<(StatusCode, Json<ConnectionWithNotes>), AppError> {
    let connection = state.notes.create_connection(user.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(connection)))
}

pub async fn delete_connection(
    State(state): State<VaultState>,
    user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.notes.delete_connection(user.user_id, id).await?;
    Ok(SuccessResponse::ok())
}

// ============================================================================
// Review
// ============================================================================

pub async fn review(
    State(state): State<VaultState>,
    user: AuthUser,
) -> Result<Json<ReviewSummary>, AppError> {
    Ok(Json(state.notes.review_summary(user.user_id).await?))
}
