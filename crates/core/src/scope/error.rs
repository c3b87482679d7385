//! Scope resolution error types.

use commission_shared::AppError;
use commission_shared::types::UserId;
use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur while resolving a principal's visibility.
#[derive(Debug, Error)]
pub enum ScopeError {
    /// The authenticated user no longer exists.
    #[error("user {0} not found")]
    UnknownPrincipal(UserId),

    /// The user record could not be read.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ScopeError> for AppError {
    fn from(err: ScopeError) -> Self {
        match err {
            ScopeError::UnknownPrincipal(_) => Self::Unauthorized(err.to_string()),
            ScopeError::Store(e) => Self::Database(e.to_string()),
        }
    }
}
