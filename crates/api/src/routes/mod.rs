//! API route definitions.

use std::fmt::Display;
use std::str::FromStr;

use axum::{Json, Router, middleware};
use commission_db::entities::sea_orm_active_enums::RecordStatus;
use commission_shared::types::PageRequest;
use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::{admin_middleware, auth_middleware, scope_middleware},
};

pub mod auth;
pub mod commission_projects;
pub mod companies;
pub mod departments;
pub mod employees;
pub mod health;
pub mod positions;
pub mod project_permissions;
pub mod reports;
pub mod users;

/// Creates the API router: public, admin-only and scope-gated routes.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let admin_routes = Router::new()
        .merge(users::admin_routes())
        .merge(companies::admin_routes())
        .merge(departments::admin_routes())
        .merge(positions::admin_routes())
        .merge(employees::admin_routes())
        .merge(project_permissions::admin_routes())
        .merge(commission_projects::admin_routes())
        .merge(reports::admin_routes())
        .layer(middleware::from_fn(admin_middleware));

    let scoped_routes = Router::new()
        .merge(reports::scoped_routes())
        .merge(employees::scoped_routes())
        .merge(companies::read_routes())
        .merge(departments::read_routes())
        .merge(positions::read_routes())
        .merge(project_permissions::read_routes())
        .merge(commission_projects::read_routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            scope_middleware,
        ));

    // Layers run outside-in, so authentication happens before the admin
    // and scope layers see the request.
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .nest("/admin", admin_routes)
        .merge(scoped_routes)
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}

// ============================================================================
// Shared request helpers
// ============================================================================

/// Treats a missing or blank query value as absent.
pub(crate) fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Paging, search and status parameters shared by list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Page number, 1-based.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<u32>,
    /// Items per page.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page_size: Option<u32>,
    /// Substring filter on the name column.
    #[serde(default)]
    pub search: Option<String>,
    /// `active` or `inactive`.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub status: Option<RecordStatus>,
}

impl ListQuery {
    /// The requested page, clamped to valid bounds.
    pub fn page_request(&self) -> PageRequest {
        let defaults = PageRequest::default();
        PageRequest::new(
            self.page.unwrap_or(defaults.page),
            self.page_size.unwrap_or(defaults.page_size),
        )
    }

    /// The search term, if non-blank.
    pub fn search(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
    }
}

/// Rejects a blank required field.
pub(crate) fn require(field: &str, value: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(format!("{field} is required")));
    }
    Ok(())
}

/// Body returned by successful deletes.
pub(crate) fn deleted(what: &str) -> Json<Value> {
    Json(json!({ "message": format!("{what} deleted") }))
}
