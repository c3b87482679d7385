//! Repository error type.

use commission_core::integrity::GuardError;
use commission_core::report::ReportError;
use commission_core::store::EntityKind;
use commission_core::summary::SummaryError;
use commission_shared::AppError;
use sea_orm::DbErr;

/// Errors returned by the repositories.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Row not found (or not visible to the caller).
    #[error("{kind} {id} not found")]
    NotFound {
        /// Kind of the missing row.
        kind: EntityKind,
        /// Requested id.
        id: i32,
    },

    /// Username already taken.
    #[error("Username '{0}' already exists")]
    DuplicateUsername(String),

    /// Integrity check failed.
    #[error(transparent)]
    Guard(#[from] GuardError),

    /// Report planning failed.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Summary computation failed.
    #[error(transparent)]
    Summary(#[from] SummaryError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl RepositoryError {
    pub(crate) const fn not_found(kind: EntityKind, id: i32) -> Self {
        Self::NotFound { kind, id }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { .. } => Self::NotFound(err.to_string()),
            RepositoryError::DuplicateUsername(_) => Self::Conflict(err.to_string()),
            RepositoryError::Guard(e) => e.into(),
            RepositoryError::Report(e) => e.into(),
            RepositoryError::Summary(e) => e.into(),
            RepositoryError::Database(e) => Self::Database(e.to_string()),
        }
    }
}
