//! Report write planning.
//!
//! Turns incoming report drafts and patches into the full rows to persist:
//! dates are validated, foreign keys checked, and the employee fields a
//! report caches are copied from the current employee record.

pub mod error;
pub mod planner;
pub mod types;


pub use error::ReportError;
pub use planner::{ReportPlanner, validate_date, validate_value};
pub use types::{ReportDraft, ReportPatch, ReportPlan};
