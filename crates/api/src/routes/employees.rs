//! Employee routes.
//!
//! Administrators see every employee; the scoped list only returns the
//! employees inside the caller's scope.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, put},
};
use commission_core::scope::Visibility;
use commission_db::{
    EmployeeRepository,
    entities::{employees, sea_orm_active_enums::RecordStatus},
    repositories::{CreateEmployeeInput, EmployeeFilter, UpdateEmployeeInput},
};
use commission_shared::types::{CompanyId, DepartmentId, EmployeeId, PageResponse, PositionId};
use serde::Deserialize;
use serde_json::Value;

use super::{ListQuery, deleted, empty_as_none, require};
use crate::{
    AppState,
    error::{ApiJson, ApiPath, ApiQuery, ApiResult},
    middleware::Scoped,
};

/// Admin CRUD routes, mounted under `/admin`.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/employees", get(list_all_employees).post(create_employee))
        .route(
            "/employees/{id}",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
        .route("/employees/{id}/toggle-status", put(toggle_employee_status))
}

/// Scope-filtered list for every authenticated user.
pub fn scoped_routes() -> Router<AppState> {
    Router::new().route("/employees", get(list_visible_employees))
}

/// Employee-specific list filters.
#[derive(Debug, Default, Deserialize)]
pub struct EmployeeQuery {
    /// Filter by company.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub company_id: Option<CompanyId>,
    /// Filter by department.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub department_id: Option<DepartmentId>,
    /// Filter by position.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub position_id: Option<PositionId>,
}

/// Request body for creating an employee.
#[derive(Debug, Deserialize)]
pub struct CreateEmployeeRequest {
    /// Company the employee belongs to.
    pub company_id: CompanyId,
    /// Department the employee belongs to.
    pub department_id: DepartmentId,
    /// Position the employee holds.
    pub position_id: PositionId,
    /// Comma-separated project permission ids.
    #[serde(default)]
    pub project_perm_ids: String,
    /// Display name.
    pub name: String,
    /// Initial status, active when absent.
    pub status: Option<RecordStatus>,
}

/// Request body for updating an employee.
#[derive(Debug, Deserialize)]
pub struct UpdateEmployeeRequest {
    /// New company.
    pub company_id: Option<CompanyId>,
    /// New department.
    pub department_id: Option<DepartmentId>,
    /// New position.
    pub position_id: Option<PositionId>,
    /// New comma-separated permission category ids.
    pub project_perm_ids: Option<String>,
    /// New display name.
    pub name: Option<String>,
    /// New status.
    pub status: Option<RecordStatus>,
}

fn repo(state: &AppState) -> EmployeeRepository {
    EmployeeRepository::new((*state.db).clone())
}

async fn list_employees(
    state: &AppState,
    query: &ListQuery,
    extra: EmployeeQuery,
    visibility: &Visibility,
) -> ApiResult<Json<PageResponse<employees::Model>>> {
    let filter = EmployeeFilter {
        search: query.search(),
        status: query.status,
        company_id: extra.company_id,
        department_id: extra.department_id,
        position_id: extra.position_id,
    };
    Ok(Json(
        repo(state)
            .list(&filter, visibility, &query.page_request())
            .await?,
    ))
}

/// GET /admin/employees
async fn list_all_employees(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
    ApiQuery(extra): ApiQuery<EmployeeQuery>,
) -> ApiResult<Json<PageResponse<employees::Model>>> {
    list_employees(&state, &query, extra, &Visibility::All).await
}

/// GET /employees - Only employees inside the caller's scope.
async fn list_visible_employees(
    State(state): State<AppState>,
    Scoped(visibility): Scoped,
    ApiQuery(query): ApiQuery<ListQuery>,
    ApiQuery(extra): ApiQuery<EmployeeQuery>,
) -> ApiResult<Json<PageResponse<employees::Model>>> {
    list_employees(&state, &query, extra, &visibility).await
}

/// GET /admin/employees/{id}
async fn get_employee(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<EmployeeId>,
) -> ApiResult<Json<employees::Model>> {
    Ok(Json(repo(&state).find_by_id(id).await?))
}

/// POST /admin/employees - Company, department and position must exist.
async fn create_employee(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateEmployeeRequest>,
) -> ApiResult<(StatusCode, Json<employees::Model>)> {
    require("name", &payload.name)?;

    let employee = repo(&state)
        .create(CreateEmployeeInput {
            company_id: payload.company_id,
            department_id: payload.department_id,
            position_id: payload.position_id,
            project_perm_ids: payload.project_perm_ids,
            name: payload.name,
            status: payload.status,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

/// PUT /admin/employees/{id}
///
/// Existing reports keep the name and organisation they were written with.
async fn update_employee(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<EmployeeId>,
    ApiJson(payload): ApiJson<UpdateEmployeeRequest>,
) -> ApiResult<Json<employees::Model>> {
    if let Some(name) = &payload.name {
        require("name", name)?;
    }

    let employee = repo(&state)
        .update(
            id,
            UpdateEmployeeInput {
                company_id: payload.company_id,
                department_id: payload.department_id,
                position_id: payload.position_id,
                project_perm_ids: payload.project_perm_ids,
                name: payload.name,
                status: payload.status,
            },
        )
        .await?;
    Ok(Json(employee))
}

/// DELETE /admin/employees/{id} - Refused while reports reference the employee.
async fn delete_employee(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<EmployeeId>,
) -> ApiResult<Json<Value>> {
    repo(&state).delete(id).await?;
    Ok(deleted("Employee"))
}

/// PUT /admin/employees/{id}/toggle-status
async fn toggle_employee_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<EmployeeId>,
) -> ApiResult<Json<employees::Model>> {
    Ok(Json(repo(&state).toggle_status(id).await?))
}
