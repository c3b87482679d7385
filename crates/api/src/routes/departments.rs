//! Department routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, put},
};
use commission_db::{
    DepartmentRepository,
    entities::{departments, sea_orm_active_enums::RecordStatus},
    repositories::{CreateDepartmentInput, DepartmentFilter, UpdateDepartmentInput},
};
use commission_shared::types::{CompanyId, DepartmentId, PageResponse};
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
        .route("/departments", get(list_departments).post(create_department))
        .route(
            "/departments/{id}",
            get(get_department)
                .put(update_department)
                .delete(delete_department),
        )
        .route(
            "/departments/{id}/toggle-status",
            put(toggle_department_status),
        )
}

/// Read-only routes for every authenticated user.
pub fn read_routes() -> Router<AppState> {
    Router::new().route("/departments", get(list_departments))
}

/// Department-specific list filters.
#[derive(Debug, Default, Deserialize)]
pub struct DepartmentQuery {
    /// Only departments of this company.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub company_id: Option<CompanyId>,
}

/// Request body for creating a department.
#[derive(Debug, Deserialize)]
pub struct CreateDepartmentRequest {
    /// Owning company.
    pub company_id: CompanyId,
    /// Department name.
    pub name: String,
    /// Initial status.
    pub status: Option<RecordStatus>,
}

/// Request body for updating a department.
#[derive(Debug, Deserialize)]
pub struct UpdateDepartmentRequest {
    /// New company.
    pub company_id: Option<CompanyId>,
    /// New display name.
    pub name: Option<String>,
    /// New status.
    pub status: Option<RecordStatus>,
}

fn repo(state: &AppState) -> DepartmentRepository {
    DepartmentRepository::new((*state.db).clone())
}

/// GET /departments
async fn list_departments(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
    ApiQuery(extra): ApiQuery<DepartmentQuery>,
) -> ApiResult<Json<PageResponse<departments::Model>>> {
    let filter = DepartmentFilter {
        search: query.search(),
        status: query.status,
        company_id: extra.company_id,
    };
    Ok(Json(repo(&state).list(&filter, &query.page_request()).await?))
}

/// GET /departments/{id}
async fn get_department(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DepartmentId>,
) -> ApiResult<Json<departments::Model>> {
    Ok(Json(repo(&state).find_by_id(id).await?))
}

/// POST /departments - The company must exist.
async fn create_department(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateDepartmentRequest>,
) -> ApiResult<(StatusCode, Json<departments::Model>)> {
    require("name", &payload.name)?;

    let department = repo(&state)
        .create(CreateDepartmentInput {
            company_id: payload.company_id,
            name: payload.name,
            status: payload.status,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(department)))
}

/// PUT /departments/{id}
async fn update_department(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DepartmentId>,
    ApiJson(payload): ApiJson<UpdateDepartmentRequest>,
) -> ApiResult<Json<departments::Model>> {
    if let Some(name) = &payload.name {
        require("name", name)?;
    }

    let department = repo(&state)
        .update(
            id,
            UpdateDepartmentInput {
                company_id: payload.company_id,
                name: payload.name,
                status: payload.status,
            },
        )
        .await?;
    Ok(Json(department))
}

/// DELETE /departments/{id} - Refused while employees belong to it.
async fn delete_department(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DepartmentId>,
) -> ApiResult<Json<Value>> {
    repo(&state).delete(id).await?;
    Ok(deleted("Department"))
}

/// PUT /departments/{id}/toggle-status
async fn toggle_department_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DepartmentId>,
) -> ApiResult<Json<departments::Model>> {
    Ok(Json(repo(&state).toggle_status(id).await?))
}
