//! Summary error types.

use commission_shared::AppError;
use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur while computing a monthly summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// No month parameter was supplied.
    #[error("month required")]
    MonthRequired,

    /// The month parameter is not `YYYY-MM`.
    #[error("invalid date format")]
    InvalidMonth(String),

    /// Report lines could not be read.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<SummaryError> for AppError {
    fn from(err: SummaryError) -> Self {
        match err {
            SummaryError::MonthRequired | SummaryError::InvalidMonth(_) => {
                Self::Validation(err.to_string())
            }
            SummaryError::Store(e) => Self::Database(e.to_string()),
        }
    }
}
