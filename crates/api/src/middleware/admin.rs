//! Admin gate for `/admin` routes.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use commission_shared::{AppError, Claims};

use crate::error::ApiError;

/// Rejects callers whose token lacks the admin flag.
///
/// Must run after [`super::auth_middleware`].
pub async fn admin_middleware(request: Request, next: Next) -> Response {
    match request.extensions().get::<Claims>() {
        Some(claims) if claims.is_admin => next.run(request).await,
        Some(_) => {
            ApiError(AppError::Forbidden("Administrator access required".into())).into_response()
        }
        None => ApiError(AppError::Unauthorized("Authentication required".into())).into_response(),
    }
}
