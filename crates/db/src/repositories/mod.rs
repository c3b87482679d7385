//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Writes that depend on an integrity check run the check and the write in
//! one transaction.

pub mod commission_project;
pub mod company;
pub mod department;
pub mod employee;
pub mod error;
pub mod position;
pub mod project_permission;
pub mod report;
pub mod user;

pub use commission_project::{
    CommissionProjectFilter, CommissionProjectRepository, CreateCommissionProjectInput,
    UpdateCommissionProjectInput,
};
pub use company::{CompanyFilter, CompanyRepository, CreateCompanyInput, UpdateCompanyInput};
pub use department::{
    CreateDepartmentInput, DepartmentFilter, DepartmentRepository, UpdateDepartmentInput,
};
pub use employee::{CreateEmployeeInput, EmployeeFilter, EmployeeRepository, UpdateEmployeeInput};
pub use error::RepositoryError;
pub use position::{CreatePositionInput, PositionFilter, PositionRepository, UpdatePositionInput};
pub use project_permission::{
    CreateProjectPermissionInput, ProjectPermissionFilter, ProjectPermissionRepository,
    UpdateProjectPermissionInput,
};
pub use report::{ReportFilter, ReportRepository};
pub use user::{CreateUserInput, UpdateUserInput, UserFilter, UserRepository};

use commission_shared::types::{PageRequest, PageResponse};
use sea_orm::{
    ConnectionTrait, DatabaseBackend, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    IsolationLevel, PaginatorTrait, QuerySelect, Select, TransactionTrait,
};

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Opens the transaction a guarded write runs in.
///
/// PostgreSQL runs it `SERIALIZABLE` so a concurrent insert of a dependent
/// row or delete of a referenced row aborts one of the two transactions.
pub(crate) async fn begin_guarded(db: &DatabaseConnection) -> Result<DatabaseTransaction, DbErr> {
    let isolation = match db.get_database_backend() {
        DatabaseBackend::Postgres => Some(IsolationLevel::Serializable),
        _ => None,
    };
    db.begin_with_config(isolation, None).await
}

/// Counts `query`, then fetches the requested page of it.
pub(crate) async fn fetch_page<E, C>(
    query: Select<E>,
    page: &PageRequest,
    db: &C,
) -> Result<PageResponse<E::Model>, DbErr>
where
    E: EntityTrait,
    E::Model: Send + Sync + 'static,
    C: ConnectionTrait,
{
    let page = page.clone().normalized();
    let total = query.clone().count(db).await?;
    let data = query
        .offset(page.offset())
        .limit(page.limit())
        .all(db)
        .await?;

    Ok(PageResponse::new(data, &page, total))
}
