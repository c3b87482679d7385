//! Report routes.
//!
//! Administrators read and edit every report under `/admin/reports`.
//! Submission and the `/my-reports` views are limited to the caller's scope:
//! submitting for an employee outside it is forbidden, and reading a report
//! outside it looks like a missing report.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
};
use commission_core::report::{ReportDraft, ReportPatch};
use commission_core::scope::Visibility;
use commission_core::summary::MonthlySummary;
use commission_db::{
    ReportRepository, entities::reports, repositories::ReportFilter,
};
use commission_shared::types::{
    CommissionProjectId, CompanyId, DepartmentId, EmployeeId, PageResponse, ReportId,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use super::{ListQuery, deleted, empty_as_none};
use crate::{
    AppState,
    error::{ApiJson, ApiPath, ApiQuery, ApiResult},
    middleware::{AuthUser, Scoped},
};

/// Admin routes, mounted under `/admin`.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/reports", get(list_all_reports))
        .route("/reports/monthly-summary", get(all_monthly_summary))
        .route(
            "/reports/{id}",
            get(get_any_report).put(update_report).delete(delete_report),
        )
        .route("/reports/{id}/toggle-status", put(toggle_report_status))
}

/// Scope-gated routes for every authenticated user.
pub fn scoped_routes() -> Router<AppState> {
    Router::new()
        .route("/reports", post(create_report))
        .route("/reports/batch", post(create_report_batch))
        .route("/my-reports", get(list_my_reports))
        .route("/my-reports/monthly-summary", get(my_monthly_summary))
        .route("/my-reports/{id}", get(get_my_report))
}

/// Report-specific list filters.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    /// Filter by employee.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub employee_id: Option<EmployeeId>,
    /// Filter by company.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub company_id: Option<CompanyId>,
    /// Filter by department.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub department_id: Option<DepartmentId>,
    /// Filter by commission project.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub commission_project_id: Option<CommissionProjectId>,
    /// Inclusive lower date bound, `YYYY-MM-DD`.
    #[serde(default)]
    pub start_date: Option<String>,
    /// Inclusive upper date bound, `YYYY-MM-DD`.
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Query of the monthly summary endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    /// `YYYY-MM`.
    pub month: Option<String>,
}

fn repo(state: &AppState) -> ReportRepository {
    ReportRepository::new((*state.db).clone())
}

async fn list_reports(
    state: &AppState,
    query: &ListQuery,
    extra: ReportQuery,
    visibility: &Visibility,
) -> ApiResult<Json<PageResponse<reports::Model>>> {
    let filter = ReportFilter {
        search: query.search(),
        status: query.status,
        employee_id: extra.employee_id,
        company_id: extra.company_id,
        department_id: extra.department_id,
        commission_project_id: extra.commission_project_id,
        start_date: extra.start_date,
        end_date: extra.end_date,
    };
    Ok(Json(
        repo(state)
            .list(&filter, visibility, &query.page_request())
            .await?,
    ))
}

// ============================================================================
// Admin
// ============================================================================

/// GET /admin/reports - Newest first.
async fn list_all_reports(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
    ApiQuery(extra): ApiQuery<ReportQuery>,
) -> ApiResult<Json<PageResponse<reports::Model>>> {
    list_reports(&state, &query, extra, &Visibility::All).await
}

/// GET /admin/reports/{id}
async fn get_any_report(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ReportId>,
) -> ApiResult<Json<reports::Model>> {
    Ok(Json(repo(&state).find_by_id(id, &Visibility::All).await?))
}

/// PUT /admin/reports/{id}
///
/// Changing `employee_id` re-copies the employee's name and organisation.
async fn update_report(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ReportId>,
    ApiJson(patch): ApiJson<ReportPatch>,
) -> ApiResult<Json<reports::Model>> {
    Ok(Json(repo(&state).update(id, &patch).await?))
}

/// DELETE /admin/reports/{id}
async fn delete_report(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ReportId>,
) -> ApiResult<Json<Value>> {
    repo(&state).delete(id).await?;
    Ok(deleted("Report"))
}

/// PUT /admin/reports/{id}/toggle-status
async fn toggle_report_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ReportId>,
) -> ApiResult<Json<reports::Model>> {
    Ok(Json(repo(&state).toggle_status(id).await?))
}

/// GET /admin/reports/monthly-summary?month=YYYY-MM
async fn all_monthly_summary(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SummaryQuery>,
) -> ApiResult<Json<MonthlySummary>> {
    Ok(Json(
        repo(&state)
            .monthly_summary(query.month.as_deref(), &Visibility::All)
            .await?,
    ))
}

// ============================================================================
// Scoped
// ============================================================================

/// POST /reports
async fn create_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Scoped(visibility): Scoped,
    ApiJson(draft): ApiJson<ReportDraft>,
) -> ApiResult<(StatusCode, Json<reports::Model>)> {
    let report = repo(&state).create(&draft, &visibility).await?;
    info!(user_id = %auth.user_id(), report_id = report.id, "Report submitted");
    Ok((StatusCode::CREATED, Json(report)))
}

/// POST /reports/batch - Stores every report or none.
async fn create_report_batch(
    State(state): State<AppState>,
    auth: AuthUser,
    Scoped(visibility): Scoped,
    ApiJson(drafts): ApiJson<Vec<ReportDraft>>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let count = repo(&state).create_batch(&drafts, &visibility).await?;
    info!(user_id = %auth.user_id(), count, "Report batch submitted");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Reports created",
            "count": count
        })),
    ))
}

/// GET /my-reports
async fn list_my_reports(
    State(state): State<AppState>,
    Scoped(visibility): Scoped,
    ApiQuery(query): ApiQuery<ListQuery>,
    ApiQuery(extra): ApiQuery<ReportQuery>,
) -> ApiResult<Json<PageResponse<reports::Model>>> {
    list_reports(&state, &query, extra, &visibility).await
}

/// GET /my-reports/{id}
async fn get_my_report(
    State(state): State<AppState>,
    Scoped(visibility): Scoped,
    ApiPath(id): ApiPath<ReportId>,
) -> ApiResult<Json<reports::Model>> {
    Ok(Json(repo(&state).find_by_id(id, &visibility).await?))
}

/// GET /my-reports/monthly-summary?month=YYYY-MM
async fn my_monthly_summary(
    State(state): State<AppState>,
    Scoped(visibility): Scoped,
    ApiQuery(query): ApiQuery<SummaryQuery>,
) -> ApiResult<Json<MonthlySummary>> {
    Ok(Json(
        repo(&state)
            .monthly_summary(query.month.as_deref(), &visibility)
            .await?,
    ))
}
