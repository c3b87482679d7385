//! Login and profile routes.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use commission_db::{UserRepository, entities::users};
use commission_shared::{
    AppError,
    auth::{LoginRequest, LoginResponse, UpdateProfileRequest, UserInfo},
    types::UserId,
};
use tracing::{error, info};

use super::require;
use crate::{
    AppState,
    error::{ApiError, ApiJson, ApiResult},
    middleware::AuthUser,
};

/// Creates the public auth router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// Creates the routes available to any authenticated user.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile).put(update_profile))
}

fn user_info(user: users::Model) -> UserInfo {
    UserInfo {
        id: user.id,
        username: user.username,
        name: user.name,
        is_admin: user.is_admin,
        employee_scope: user.employee_scope,
    }
}

fn invalid_credentials() -> ApiError {
    ApiError(AppError::Unauthorized("Invalid username or password".into()))
}

/// POST /login - Authenticate an active user and issue a token.
async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    require("username", &payload.username)?;
    require("password", &payload.password)?;

    let user_repo = UserRepository::new((*state.db).clone());
    let Some(user) = user_repo.find_active_by_username(&payload.username).await? else {
        info!(username = %payload.username, "Login attempt for unknown or inactive user");
        return Err(invalid_credentials());
    };

    if payload.password != *state.login_password {
        info!(user_id = user.id, "Login attempt with wrong password");
        return Err(invalid_credentials());
    }

    let token = state
        .jwt_service
        .generate_access_token(UserId::new(user.id), &user.username, user.is_admin)
        .map_err(|e| {
            error!(error = %e, "Failed to generate access token");
            ApiError(AppError::Internal(e.to_string()))
        })?;

    info!(user_id = user.id, is_admin = user.is_admin, "User logged in");
    Ok(Json(LoginResponse {
        token,
        user: user_info(user),
    }))
}

/// GET /profile - The caller's own user record.
async fn get_profile(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<UserInfo>> {
    let user = UserRepository::new((*state.db).clone())
        .find_by_id(auth.user_id())
        .await?;
    Ok(Json(user_info(user)))
}

/// PUT /profile - Change the caller's display name.
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<UpdateProfileRequest>,
) -> ApiResult<Json<UserInfo>> {
    require("name", &payload.name)?;

    let user = UserRepository::new((*state.db).clone())
        .update_profile(auth.user_id(), payload.name)
        .await?;
    Ok(Json(user_info(user)))
}
