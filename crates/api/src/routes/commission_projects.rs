//! Commission project routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, put},
};
use commission_db::{
    CommissionProjectRepository,
    entities::{commission_projects, sea_orm_active_enums::RecordStatus},
    repositories::{
        CommissionProjectFilter, CreateCommissionProjectInput, UpdateCommissionProjectInput,
    },
};
use commission_shared::types::{CommissionProjectId, PageResponse, ProjectPermissionId};
use serde::Deserialize;
use serde_json::Value;

use super::{ListQuery, deleted, empty_as_none, require};
use crate::{
    AppState,
    error::{ApiJson, ApiPath, ApiQuery, ApiResult},
};

/// Admin CRUD routes, mounted under `/admin`.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/commission-projects",
            get(list_commission_projects).post(create_commission_project),
        )
        .route(
            "/commission-projects/{id}",
            get(get_commission_project)
                .put(update_commission_project)
                .delete(delete_commission_project),
        )
        .route(
            "/commission-projects/{id}/toggle-status",
            put(toggle_commission_project_status),
        )
}

/// Read-only routes for every authenticated user.
pub fn read_routes() -> Router<AppState> {
    Router::new().route("/commission-projects", get(list_commission_projects))
}

/// Project-specific list filters.
#[derive(Debug, Default, Deserialize)]
pub struct CommissionProjectQuery {
    /// Only projects under this permission.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub project_perm_id: Option<ProjectPermissionId>,
}

/// Request body for creating a commission project.
#[derive(Debug, Deserialize)]
pub struct CreateCommissionProjectRequest {
    /// Display name of the project.
    pub field_name: String,
    /// Permission the project belongs to.
    pub project_perm_id: ProjectPermissionId,
    /// Initial status.
    pub status: Option<RecordStatus>,
}

/// Request body for updating a commission project.
#[derive(Debug, Deserialize)]
pub struct UpdateCommissionProjectRequest {
    /// New field name.
    pub field_name: Option<String>,
    /// New permission category.
    pub project_perm_id: Option<ProjectPermissionId>,
    /// New status.
    pub status: Option<RecordStatus>,
}

fn repo(state: &AppState) -> CommissionProjectRepository {
    CommissionProjectRepository::new((*state.db).clone())
}

/// GET /commission-projects
async fn list_commission_projects(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
    ApiQuery(extra): ApiQuery<CommissionProjectQuery>,
) -> ApiResult<Json<PageResponse<commission_projects::Model>>> {
    let filter = CommissionProjectFilter {
        search: query.search(),
        status: query.status,
        project_perm_id: extra.project_perm_id,
    };
    Ok(Json(repo(&state).list(&filter, &query.page_request()).await?))
}

/// GET /commission-projects/{id}
async fn get_commission_project(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CommissionProjectId>,
) -> ApiResult<Json<commission_projects::Model>> {
    Ok(Json(repo(&state).find_by_id(id).await?))
}

/// POST /commission-projects - The permission must exist.
async fn create_commission_project(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateCommissionProjectRequest>,
) -> ApiResult<(StatusCode, Json<commission_projects::Model>)> {
    require("field_name", &payload.field_name)?;

    let project = repo(&state)
        .create(CreateCommissionProjectInput {
            field_name: payload.field_name,
            project_perm_id: payload.project_perm_id,
            status: payload.status,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// PUT /commission-projects/{id}
async fn update_commission_project(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CommissionProjectId>,
    ApiJson(payload): ApiJson<UpdateCommissionProjectRequest>,
) -> ApiResult<Json<commission_projects::Model>> {
    if let Some(field_name) = &payload.field_name {
        require("field_name", field_name)?;
    }

    let project = repo(&state)
        .update(
            id,
            UpdateCommissionProjectInput {
                field_name: payload.field_name,
                project_perm_id: payload.project_perm_id,
                status: payload.status,
            },
        )
        .await?;
    Ok(Json(project))
}

/// DELETE /commission-projects/{id} - Refused while reports use it.
async fn delete_commission_project(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CommissionProjectId>,
) -> ApiResult<Json<Value>> {
    repo(&state).delete(id).await?;
    Ok(deleted("Commission project"))
}

/// PUT /commission-projects/{id}/toggle-status
async fn toggle_commission_project_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CommissionProjectId>,
) -> ApiResult<Json<commission_projects::Model>> {
    Ok(Json(repo(&state).toggle_status(id).await?))
}
