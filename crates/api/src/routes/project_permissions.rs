//! Project permission routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, put},
};
use commission_db::{
    ProjectPermissionRepository,
    entities::{project_permissions, sea_orm_active_enums::RecordStatus},
    repositories::{ProjectPermissionFilter, CreateProjectPermissionInput, UpdateProjectPermissionInput},
};
use commission_shared::types::{ProjectPermissionId, PageResponse};
use serde::Deserialize;
use serde_json::Value;

use super::{ListQuery, deleted, require};
use crate::{
    AppState,
    error::{ApiJson, ApiPath, ApiQuery, ApiResult},
};

/// Admin CRUD routes, mounted under `/admin`.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/project-permissions", get(list_project_permissions).post(create_project_permission))
        .route(
            "/project-permissions/{id}",
            get(get_project_permission).put(update_project_permission).delete(delete_project_permission),
        )
        .route("/project-permissions/{id}/toggle-status", put(toggle_project_permission_status))
}

/// Read-only routes for every authenticated user.
pub fn read_routes() -> Router<AppState> {
    Router::new().route("/project-permissions", get(list_project_permissions))
}

/// Request body for creating a project permission.
#[derive(Debug, Deserialize)]
pub struct CreateProjectPermissionRequest {
    /// Permission name.
    pub permission: String,
    /// Initial status.
    pub status: Option<RecordStatus>,
}

/// Request body for updating a project permission.
#[derive(Debug, Deserialize)]
pub struct UpdateProjectPermissionRequest {
    /// Permission name.
    pub permission: Option<String>,
    /// Status.
    pub status: Option<RecordStatus>,
}

fn repo(state: &AppState) -> ProjectPermissionRepository {
    ProjectPermissionRepository::new((*state.db).clone())
}

/// GET /project-permissions
async fn list_project_permissions(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Json<PageResponse<project_permissions::Model>>> {
    let filter = ProjectPermissionFilter {
        search: query.search(),
        status: query.status,
    };
    Ok(Json(repo(&state).list(&filter, &query.page_request()).await?))
}

/// GET /project-permissions/{id}
async fn get_project_permission(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ProjectPermissionId>,
) -> ApiResult<Json<project_permissions::Model>> {
    Ok(Json(repo(&state).find_by_id(id).await?))
}

/// POST /project-permissions
async fn create_project_permission(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateProjectPermissionRequest>,
) -> ApiResult<(StatusCode, Json<project_permissions::Model>)> {
    require("permission", &payload.permission)?;

    let permission = repo(&state)
        .create(CreateProjectPermissionInput {
            permission: payload.permission,
            status: payload.status,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(permission)))
}

/// PUT /project-permissions/{id}
async fn update_project_permission(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ProjectPermissionId>,
    ApiJson(payload): ApiJson<UpdateProjectPermissionRequest>,
) -> ApiResult<Json<project_permissions::Model>> {
    if let Some(permission) = &payload.permission {
        require("permission", permission)?;
    }

    let permission = repo(&state)
        .update(
            id,
            UpdateProjectPermissionInput {
                permission: payload.permission,
                status: payload.status,
            },
        )
        .await?;
    Ok(Json(permission))
}

/// DELETE /project-permissions/{id} - Refused while commission projects reference it.
async fn delete_project_permission(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ProjectPermissionId>,
) -> ApiResult<Json<Value>> {
    repo(&state).delete(id).await?;
    Ok(deleted("Project permission"))
}

/// PUT /project-permissions/{id}/toggle-status
async fn toggle_project_permission_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ProjectPermissionId>,
) -> ApiResult<Json<project_permissions::Model>> {
    Ok(Json(repo(&state).toggle_status(id).await?))
}
