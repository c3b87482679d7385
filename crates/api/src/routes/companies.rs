//! Company routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, put},
};
use commission_db::{
    CompanyRepository,
    entities::{companies, sea_orm_active_enums::RecordStatus},
    repositories::{CompanyFilter, CreateCompanyInput, UpdateCompanyInput},
};
use commission_shared::types::{CompanyId, PageResponse};
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
        .route("/companies", get(list_companies).post(create_company))
        .route(
            "/companies/{id}",
            get(get_company).put(update_company).delete(delete_company),
        )
        .route("/companies/{id}/toggle-status", put(toggle_company_status))
}

/// Read-only routes for every authenticated user.
pub fn read_routes() -> Router<AppState> {
    Router::new().route("/companies", get(list_companies))
}

/// Request body for creating a company.
#[derive(Debug, Deserialize)]
pub struct CreateCompanyRequest {
    /// Company name.
    pub name: String,
    /// Initial status.
    pub status: Option<RecordStatus>,
}

/// Request body for updating a company.
#[derive(Debug, Deserialize)]
pub struct UpdateCompanyRequest {
    /// Company name.
    pub name: Option<String>,
    /// Status.
    pub status: Option<RecordStatus>,
}

fn repo(state: &AppState) -> CompanyRepository {
    CompanyRepository::new((*state.db).clone())
}

/// GET /companies
async fn list_companies(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Json<PageResponse<companies::Model>>> {
    let filter = CompanyFilter {
        search: query.search(),
        status: query.status,
    };
    Ok(Json(repo(&state).list(&filter, &query.page_request()).await?))
}

/// GET /companies/{id}
async fn get_company(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CompanyId>,
) -> ApiResult<Json<companies::Model>> {
    Ok(Json(repo(&state).find_by_id(id).await?))
}

/// POST /companies
async fn create_company(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateCompanyRequest>,
) -> ApiResult<(StatusCode, Json<companies::Model>)> {
    require("name", &payload.name)?;

    let company = repo(&state)
        .create(CreateCompanyInput {
            name: payload.name,
            status: payload.status,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(company)))
}

/// PUT /companies/{id}
async fn update_company(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CompanyId>,
    ApiJson(payload): ApiJson<UpdateCompanyRequest>,
) -> ApiResult<Json<companies::Model>> {
    if let Some(name) = &payload.name {
        require("name", name)?;
    }

    let company = repo(&state)
        .update(
            id,
            UpdateCompanyInput {
                name: payload.name,
                status: payload.status,
            },
        )
        .await?;
    Ok(Json(company))
}

/// DELETE /companies/{id} - Refused while departments or employees reference it.
async fn delete_company(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CompanyId>,
) -> ApiResult<Json<Value>> {
    repo(&state).delete(id).await?;
    Ok(deleted("Company"))
}

/// PUT /companies/{id}/toggle-status
async fn toggle_company_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CompanyId>,
) -> ApiResult<Json<companies::Model>> {
    Ok(Json(repo(&state).toggle_status(id).await?))
}
