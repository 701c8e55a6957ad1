//! Project, Area and Resource API handlers

use super::extract::{ApiJson, ApiPath};
use super::handlers::{AppError, SuccessResponse, VaultState};
use crate::auth::extractor::AuthUser;
use crate::para::{
    Collection, CollectionKind, Counted, CreateCollectionRequest, CreateProjectRequest, Project,
    UpdateCollectionRequest, UpdateProjectRequest,
};
use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use uuid::Uuid;

// ============================================================================
// Projects
// ============================================================================

/// List the caller's projects with note counts
pub async fn list_projects(
    State(state): State<VaultState>,
    user: AuthUser,
) -> Result<Json<Vec<Counted<Project>>>, AppError> {
    Ok(Json(state.para.list_projects(user.user_id).await?))
}

/// Create a project
pub async fn create_project(
    State(state): State<VaultState>,
    user: AuthUser,
    ApiJson(req): ApiJson<CreateProjectRequest>,
) -> Result<(StatusCode, Json<Project>), AppError> {
    let project = state.para.create_project(user.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// Get a project by ID
pub async fn get_project(
    State(state): State<VaultState>,
    user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Counted<Project>>, AppError> {
    Ok(Json(state.para.get_project(user.user_id, id).await?))
}

/// Update a project
pub async fn update_project(
    State(state): State<VaultState>,
    user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateProjectRequest>,
) -> Result<Json<Project>, AppError> {
    Ok(Json(state.para.update_project(user.user_id, id, req).await?))
}

/// Delete a project
pub async fn delete_project(
    State(state): State<VaultState>,
    user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.para.delete_project(user.user_id, id).await?;
    Ok(SuccessResponse::ok())
}

// ============================================================================
// Areas and Resources share one implementation per verb
// ============================================================================

async fn list_of(
    state: VaultState,
    user: AuthUser,
    kind: CollectionKind,
) -> Result<Json<Vec<Counted<Collection>>>, AppError> {
    Ok(Json(state.para.list_collections(user.user_id, kind).await?))
}

async fn create_of(
    state: VaultState,
    user: AuthUser,
    kind: CollectionKind,
    req: CreateCollectionRequest,
) -> Result<(StatusCode, Json<Collection>), AppError> {
    let collection = state.para.create_collection(user.user_id, kind, req).await?;
    Ok((StatusCode::CREATED, Json(collection)))
}

async fn get_of(
    state: VaultState,
    user: AuthUser,
    kind: CollectionKind,
    id: Uuid,
) -> Result<Json<Counted<Collection>>, AppError> {
    Ok(Json(state.para.get_collection(user.user_id, kind, id).await?))
}

async fn update_of(
    state: VaultState,
    user: AuthUser,
    kind: CollectionKind,
    id: Uuid,
    req: UpdateCollectionRequest,
) -> Result<Json<Collection>, AppError> {
    Ok(Json(
        state
            .para
            .update_collection(user.user_id, kind, id, req)
            .await?,
    ))
}

async fn delete_of(
    state: VaultState,
    user: AuthUser,
    kind: CollectionKind,
    id: Uuid,
) -> Result<Json<SuccessResponse>, AppError> {
    state.para.delete_collection(user.user_id, kind, id).await?;
    Ok(SuccessResponse::ok())
}

/// List the caller's areas with note counts
pub async fn list_areas(
    State(state): State<VaultState>,
    user: AuthUser,
) -> Result<Json<Vec<Counted<Collection>>>, AppError> {
    list_of(state, user, CollectionKind::Area).await
}

/// Create an area
pub async fn create_area(
    State(state): State<VaultState>,
    user: AuthUser,
    ApiJson(req): ApiJson<CreateCollectionRequest>,
) -> Result<(StatusCode, Json<Collection>), AppError> {
    create_of(state, user, CollectionKind::Area, req).await
}

pub async fn get_area(
    State(state): State<VaultState>,
    user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Counted<Collection>>, AppError> {
    get_of(state, user, CollectionKind::Area, id).await
}

pub async fn update_area(
    State(state): State<VaultState>,
    user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateCollectionRequest>,
) -> Result<Json<Collection>, AppError> {
    update_of(state, user, CollectionKind::Area, id, req).await
}

/// Delete an area; its notes move to Archive
pub async fn delete_area(
    State(state): State<VaultState>,
    user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<SuccessResponse>, AppError> {
    delete_of(state, user, CollectionKind::Area, id).await
}

/// List the caller's resources with note counts
pub async fn list_resources(
    State(state): State<VaultState>,
    user: AuthUser,
) -> Result<Json<Vec<Counted<Collection>>>, AppError> {
    list_of(state, user, CollectionKind::Resource).await
}

/// Create a resource
pub async fn create_resource(
    State(state): State<VaultState>,
    user: AuthUser,
    ApiJson(req): ApiJson<CreateCollectionRequest>,
) -> Result<(StatusCode, Json<Collection>), AppError> {
    create_of(state, user, CollectionKind::Resource, req).await
}

pub async fn get_resource(
    State(state): State<VaultState>,
    user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Counted<Collection>>, AppError> {
    get_of(state, user, CollectionKind::Resource, id).await
}

pub async fn update_resource(
    State(state): State<VaultState>,
    user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateCollectionRequest>,
) -> Result<Json<Collection>, AppError> {
    update_of(state, user, CollectionKind::Resource, id, req).await
}

/// Delete a resource; its notes move to Archive
pub async fn delete_resource(
    State(state): State<VaultState>,
    user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<SuccessResponse>, AppError> {
    delete_of(state, user, CollectionKind::Resource, id).await
}
