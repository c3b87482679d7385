//! Report planning error types.

use commission_shared::AppError;
use commission_shared::types::EmployeeId;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::integrity::GuardError;
use crate::store::StoreError;

/// Errors that can occur while planning a report write.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The date is not `YYYY-MM-DD`.
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    /// The commission value does not fit the stored precision.
    #[error("invalid commission value '{0}': at most 13 integer digits and 2 decimals")]
    InvalidValue(Decimal),

    /// A batch contained no reports.
    #[error("report list must not be empty")]
    EmptyBatch,

    /// The caller may not submit reports for this employee.
    #[error("employee {0} is outside your scope")]
    NotVisible(EmployeeId),

    /// A referenced row is missing.
    #[error(transparent)]
    Guard(#[from] GuardError),

    /// The store could not answer.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::InvalidDate(_)
            | ReportError::InvalidValue(_)
            | ReportError::EmptyBatch => {
                Self::Validation(err.to_string())
            }
            ReportError::NotVisible(_) => Self::Forbidden(err.to_string()),
            ReportError::Guard(e) => e.into(),
            ReportError::Store(e) => Self::Database(e.to_string()),
        }
    }
}
