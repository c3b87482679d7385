//! Position routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, put},
};
use commission_db::{
    PositionRepository,
    entities::{positions, sea_orm_active_enums::RecordStatus},
    repositories::{PositionFilter, CreatePositionInput, UpdatePositionInput},
};
use commission_shared::types::{PositionId, PageResponse};
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
        .route("/positions", get(list_positions).post(create_position))
        .route(
            "/positions/{id}",
            get(get_position).put(update_position).delete(delete_position),
        )
        .route("/positions/{id}/toggle-status", put(toggle_position_status))
}

/// Read-only routes for every authenticated user.
pub fn read_routes() -> Router<AppState> {
    Router::new().route("/positions", get(list_positions))
}

/// Request body for creating a position.
#[derive(Debug, Deserialize)]
pub struct CreatePositionRequest {
    /// Position name.
    pub name: String,
    /// Initial status.
    pub status: Option<RecordStatus>,
}

/// Request body for updating a position.
#[derive(Debug, Deserialize)]
pub struct UpdatePositionRequest {
    /// Position name.
    pub name: Option<String>,
    /// Status.
    pub status: Option<RecordStatus>,
}

fn repo(state: &AppState) -> PositionRepository {
    PositionRepository::new((*state.db).clone())
}

/// GET /positions
async fn list_positions(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Json<PageResponse<positions::Model>>> {
    let filter = PositionFilter {
        search: query.search(),
        status: query.status,
    };
    Ok(Json(repo(&state).list(&filter, &query.page_request()).await?))
}

/// GET /positions/{id}
async fn get_position(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<PositionId>,
) -> ApiResult<Json<positions::Model>> {
    Ok(Json(repo(&state).find_by_id(id).await?))
}

/// POST /positions
async fn create_position(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreatePositionRequest>,
) -> ApiResult<(StatusCode, Json<positions::Model>)> {
    require("name", &payload.name)?;

    let position = repo(&state)
        .create(CreatePositionInput {
            name: payload.name,
            status: payload.status,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(position)))
}

/// PUT /positions/{id}
async fn update_position(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<PositionId>,
    ApiJson(payload): ApiJson<UpdatePositionRequest>,
) -> ApiResult<Json<positions::Model>> {
    if let Some(name) = &payload.name {
        require("name", name)?;
    }

    let position = repo(&state)
        .update(
            id,
            UpdatePositionInput {
                name: payload.name,
                status: payload.status,
            },
        )
        .await?;
    Ok(Json(position))
}

/// DELETE /positions/{id} - Refused while employees hold it.
async fn delete_position(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<PositionId>,
) -> ApiResult<Json<Value>> {
    repo(&state).delete(id).await?;
    Ok(deleted("Position"))
}

/// PUT /positions/{id}/toggle-status
async fn toggle_position_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<PositionId>,
) -> ApiResult<Json<positions::Model>> {
    Ok(Json(repo(&state).toggle_status(id).await?))
}
