//! User administration routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, put},
};
use commission_db::{
    UserRepository,
    entities::{sea_orm_active_enums::RecordStatus, users},
    repositories::{CreateUserInput, UpdateUserInput, UserFilter},
};
use commission_shared::types::{PageResponse, UserId};
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
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/users/{id}/toggle-status", put(toggle_user_status))
}

/// Request body for creating a user.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    /// Unique login name.
    pub username: String,
    /// Display name.
    pub name: String,
    /// Administrator flag.
    #[serde(default)]
    pub is_admin: bool,
    /// `""`, `"0"` or comma-separated employee ids.
    #[serde(default)]
    pub employee_scope: String,
    /// Initial status.
    pub status: Option<RecordStatus>,
}

/// Request body for updating a user.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    /// New login name, must stay unique.
    pub username: Option<String>,
    /// New display name.
    pub name: Option<String>,
    /// Grants or revokes admin rights.
    pub is_admin: Option<bool>,
    /// New scope descriptor: empty, `0` or comma-separated ids.
    pub employee_scope: Option<String>,
    /// New status.
    pub status: Option<RecordStatus>,
}

fn repo(state: &AppState) -> UserRepository {
    UserRepository::new((*state.db).clone())
}

/// GET /admin/users - `search` matches username or display name.
async fn list_users(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Json<PageResponse<users::Model>>> {
    let filter = UserFilter {
        search: query.search(),
        status: query.status,
    };
    Ok(Json(repo(&state).list(&filter, &query.page_request()).await?))
}

/// GET /admin/users/{id}
async fn get_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<UserId>,
) -> ApiResult<Json<users::Model>> {
    Ok(Json(repo(&state).find_by_id(id).await?))
}

/// POST /admin/users - Usernames are unique.
async fn create_user(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<users::Model>)> {
    require("username", &payload.username)?;
    require("name", &payload.name)?;

    let user = repo(&state)
        .create(CreateUserInput {
            username: payload.username,
            name: payload.name,
            is_admin: payload.is_admin,
            employee_scope: payload.employee_scope,
            status: payload.status,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /admin/users/{id}
async fn update_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<UserId>,
    ApiJson(payload): ApiJson<UpdateUserRequest>,
) -> ApiResult<Json<users::Model>> {
    if let Some(username) = &payload.username {
        require("username", username)?;
    }
    if let Some(name) = &payload.name {
        require("name", name)?;
    }

    let user = repo(&state)
        .update(
            id,
            UpdateUserInput {
                username: payload.username,
                name: payload.name,
                is_admin: payload.is_admin,
                employee_scope: payload.employee_scope,
                status: payload.status,
            },
        )
        .await?;
    Ok(Json(user))
}

/// DELETE /admin/users/{id}
async fn delete_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<UserId>,
) -> ApiResult<Json<Value>> {
    repo(&state).delete(id).await?;
    Ok(deleted("User"))
}

/// PUT /admin/users/{id}/toggle-status
async fn toggle_user_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<UserId>,
) -> ApiResult<Json<users::Model>> {
    Ok(Json(repo(&state).toggle_status(id).await?))
}
