//! Storage seam for the core services.
//!
//! The services in this crate never name a concrete database. They borrow an
//! [`EntityStore`] and issue the handful of reads they need through it; the
//! SeaORM implementation lives in `commission-db`.

#[cfg(test)]
pub mod memory;

use std::collections::BTreeSet;
use std::fmt;

use async_trait::async_trait;
use commission_shared::types::{CompanyId, DepartmentId, EmployeeId, PositionId, UserId};
use thiserror::Error;

use crate::scope::Scope;
use crate::summary::{DateRange, ReportLine};

/// Result type for store reads.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reported by a store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing engine failed.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Entity types known to the integrity checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Company.
    Company,
    /// Department.
    Department,
    /// Position.
    Position,
    /// Project permission category.
    ProjectPermission,
    /// Commission project.
    CommissionProject,
    /// Employee.
    Employee,
    /// Daily commission report.
    Report,
    /// Login account.
    User,
}

impl EntityKind {
    /// Human-readable name used in error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Department => "department",
            Self::Position => "position",
            Self::ProjectPermission => "project permission",
            Self::CommissionProject => "commission project",
            Self::Employee => "employee",
            Self::Report => "report",
            Self::User => "user",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A foreign-key edge between two entity types.
///
/// Counting rows along an edge answers "how many dependents point at this
/// parent", which is what delete blocking needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForeignKey {
    /// `departments.company_id`
    DepartmentCompany,
    /// `employees.company_id`
    EmployeeCompany,
    /// `employees.department_id`
    EmployeeDepartment,
    /// `employees.position_id`
    EmployeePosition,
    /// `commission_projects.project_perm_id`
    CommissionProjectPermission,
    /// `reports.employee_id`
    ReportEmployee,
    /// `reports.commission_project_id`
    ReportCommissionProject,
}

impl ForeignKey {
    /// Entity holding the foreign key column.
    #[must_use]
    pub const fn dependent(self) -> EntityKind {
        match self {
            Self::DepartmentCompany => EntityKind::Department,
            Self::EmployeeCompany | Self::EmployeeDepartment | Self::EmployeePosition => {
                EntityKind::Employee
            }
            Self::CommissionProjectPermission => EntityKind::CommissionProject,
            Self::ReportEmployee | Self::ReportCommissionProject => EntityKind::Report,
        }
    }

    /// Entity the foreign key points at.
    #[must_use]
    pub const fn parent(self) -> EntityKind {
        match self {
            Self::DepartmentCompany | Self::EmployeeCompany => EntityKind::Company,
            Self::EmployeeDepartment => EntityKind::Department,
            Self::EmployeePosition => EntityKind::Position,
            Self::CommissionProjectPermission => EntityKind::ProjectPermission,
            Self::ReportEmployee => EntityKind::Employee,
            Self::ReportCommissionProject => EntityKind::CommissionProject,
        }
    }
}

/// The employee fields a report caches at write time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeSnapshot {
    /// Employee id.
    pub id: EmployeeId,
    /// Employee name.
    pub name: String,
    /// Company the employee belongs to.
    pub company_id: CompanyId,
    /// Department the employee belongs to.
    pub department_id: DepartmentId,
    /// Position the employee holds.
    pub position_id: PositionId,
}

/// Reads the core services need from durable storage.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Returns true if a row of `kind` with `id` exists, regardless of status.
    async fn exists(&self, kind: EntityKind, id: i32) -> StoreResult<bool>;

    /// Counts rows whose `fk` column equals `id`.
    async fn count_references(&self, fk: ForeignKey, id: i32) -> StoreResult<u64>;

    /// Loads the parsed employee scope of a user, or `None` if the user does
    /// not exist.
    async fn employee_scope(&self, user: UserId) -> StoreResult<Option<Scope>>;

    /// Lists the ids of every employee currently stored.
    async fn employee_ids(&self) -> StoreResult<Vec<EmployeeId>>;

    /// Loads the fields of an employee that reports denormalize.
    async fn find_employee(&self, id: EmployeeId) -> StoreResult<Option<EmployeeSnapshot>>;

    /// Loads active report lines dated inside `range`, with joined display
    /// names. When `employees` is given only those employees are returned.
    async fn report_lines(
        &self,
        range: &DateRange,
        employees: Option<&BTreeSet<EmployeeId>>,
    ) -> StoreResult<Vec<ReportLine>>;
}
