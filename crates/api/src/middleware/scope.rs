//! Scope resolution for employee-gated routes.
//!
//! The caller's visibility is resolved once per request and stored in the
//! request extensions, so every query of the request sees the same set.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use commission_core::scope::{Principal, ScopeResolver, Visibility};
use commission_db::SeaStore;
use commission_shared::{AppError, Claims};
use tracing::debug;

use crate::AppState;
use crate::error::ApiError;

/// Resolves the caller's visibility and attaches it to the request.
///
/// Must run after [`super::auth_middleware`].
pub async fn scope_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(principal) = request.extensions().get::<Claims>().map(Principal::from) else {
        return ApiError(AppError::Unauthorized("Authentication required".into())).into_response();
    };

    let store = SeaStore::new(state.db.as_ref());
    match ScopeResolver::new(&store).resolve(&principal).await {
        Ok(visibility) => {
            debug!(user_id = %principal.user_id, all = visibility.is_all(), "Scope attached");
            request.extensions_mut().insert(visibility);
            next.run(request).await
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Extractor for the visibility resolved by [`scope_middleware`].
#[derive(Debug, Clone)]
pub struct Scoped(pub Visibility);

impl<S> FromRequestParts<S> for Scoped
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Visibility>()
            .cloned()
            .map(Scoped)
            .ok_or_else(|| ApiError(AppError::Internal("scope was not resolved".into())))
    }
}
