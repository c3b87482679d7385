//! Integrity error types.

use commission_shared::AppError;
use thiserror::Error;

use crate::store::{EntityKind, StoreError};

/// Errors raised by [`super::IntegrityGuard`].
#[derive(Debug, Error)]
pub enum GuardError {
    /// Delete refused because dependents exist.
    #[error("cannot delete {kind} {id}: {count} {dependent} record(s) still reference it")]
    HasDependents {
        /// Kind of the row being deleted.
        kind: EntityKind,
        /// Id of the row being deleted.
        id: i32,
        /// First dependent kind found.
        dependent: EntityKind,
        /// Number of dependents of that kind.
        count: u64,
    },

    /// A supplied foreign key does not exist.
    #[error("{kind} {id} does not exist")]
    MissingReference {
        /// Referenced kind.
        kind: EntityKind,
        /// Referenced id.
        id: i32,
    },

    /// The store could not answer.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<GuardError> for AppError {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::HasDependents { .. } => Self::Conflict(err.to_string()),
            GuardError::MissingReference { .. } => Self::InvalidReference(err.to_string()),
            GuardError::Store(e) => Self::Database(e.to_string()),
        }
    }
}
