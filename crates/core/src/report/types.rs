//! Report write types.

use commission_shared::types::{
    CommissionProjectId, CompanyId, DepartmentId, EmployeeId, PositionId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A report as submitted by a client.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportDraft {
    /// Report date, `YYYY-MM-DD`.
    pub date: String,
    /// Employee the report is for.
    pub employee_id: EmployeeId,
    /// Commission project the value counts toward.
    pub commission_project_id: CommissionProjectId,
    /// Signed commission value.
    pub commission_value: Decimal,
}

/// Partial report update. Absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportPatch {
    /// New report date, `YYYY-MM-DD`.
    pub date: Option<String>,
    /// Employee to re-point the report to.
    pub employee_id: Option<EmployeeId>,
    /// New commission project.
    pub commission_project_id: Option<CommissionProjectId>,
    /// New commission value.
    pub commission_value: Option<Decimal>,
}

/// The full set of report fields to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPlan {
    /// Report date, `YYYY-MM-DD`.
    pub date: String,
    /// Employee the report is for.
    pub employee_id: EmployeeId,
    /// Cached from the employee.
    pub employee_name: String,
    /// Cached from the employee.
    pub company_id: CompanyId,
    /// Cached from the employee.
    pub department_id: DepartmentId,
    /// Cached from the employee.
    pub position_id: PositionId,
    /// Commission project the value counts toward.
    pub commission_project_id: CommissionProjectId,
    /// Signed commission value.
    pub commission_value: Decimal,
}
