//! Employee repository.

use commission_core::integrity::IntegrityGuard;
use commission_core::scope::Visibility;
use commission_core::store::EntityKind;
use commission_shared::types::{
    CompanyId, DepartmentId, EmployeeId, PageRequest, PageResponse, PositionId,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;

use super::{RepositoryError, RepositoryResult, begin_guarded, fetch_page};
use crate::entities::{employees, sea_orm_active_enums::RecordStatus};
use crate::store::{SeaStore, id_filter};

/// Input for creating an employee.
#[derive(Debug, Clone)]
pub struct CreateEmployeeInput {
    /// Employing company.
    pub company_id: CompanyId,
    /// Department.
    pub department_id: DepartmentId,
    /// Position held.
    pub position_id: PositionId,
    /// Comma-separated project permission ids.
    pub project_perm_ids: String,
    /// Employee name.
    pub name: String,
    /// Initial status, active when absent.
    pub status: Option<RecordStatus>,
}

/// Input for updating an employee.
#[derive(Debug, Clone, Default)]
pub struct UpdateEmployeeInput {
    /// New company.
    pub company_id: Option<CompanyId>,
    /// New department.
    pub department_id: Option<DepartmentId>,
    /// New position.
    pub position_id: Option<PositionId>,
    /// New comma-separated permission category ids.
    pub project_perm_ids: Option<String>,
    /// New display name.
    pub name: Option<String>,
    /// New status.
    pub status: Option<RecordStatus>,
}

/// Filter options for listing employees.
#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    /// Substring of the name.
    pub search: Option<String>,
    /// Filter by status.
    pub status: Option<RecordStatus>,
    /// Filter by company.
    pub company_id: Option<CompanyId>,
    /// Filter by department.
    pub department_id: Option<DepartmentId>,
    /// Filter by position.
    pub position_id: Option<PositionId>,
}

/// Employee repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    db: DatabaseConnection,
}

impl EmployeeRepository {
    /// Creates a new employee repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists the employees visible under `visibility`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &EmployeeFilter,
        visibility: &Visibility,
        page: &PageRequest,
    ) -> RepositoryResult<PageResponse<employees::Model>> {
        let mut query = employees::Entity::find();

        if let Some(ids) = visibility.employee_ids() {
            query = query.filter(id_filter(employees::Column::Id, ids));
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(employees::Column::Name.contains(search));
        }
        if let Some(status) = filter.status {
            query = query.filter(employees::Column::Status.eq(status));
        }
        if let Some(company_id) = filter.company_id {
            query = query.filter(employees::Column::CompanyId.eq(company_id.into_inner()));
        }
        if let Some(department_id) = filter.department_id {
            query = query.filter(employees::Column::DepartmentId.eq(department_id.into_inner()));
        }
        if let Some(position_id) = filter.position_id {
            query = query.filter(employees::Column::PositionId.eq(position_id.into_inner()));
        }

        let query = query.order_by_asc(employees::Column::Id);
        Ok(fetch_page(query, page, &self.db).await?)
    }

    /// Finds an employee by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the employee does not exist.
    pub async fn find_by_id(&self, id: EmployeeId) -> RepositoryResult<employees::Model> {
        employees::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found(EntityKind::Employee, id.into_inner()))
    }

    /// Creates an employee. Company, department and position must exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Guard` naming the first missing reference.
    pub async fn create(&self, input: CreateEmployeeInput) -> RepositoryResult<employees::Model> {
        let txn = begin_guarded(&self.db).await?;

        let store = SeaStore::new(&txn);
        let guard = IntegrityGuard::new(&store);
        guard
            .ensure_reference(EntityKind::Company, input.company_id.into_inner())
            .await?;
        guard
            .ensure_reference(EntityKind::Department, input.department_id.into_inner())
            .await?;
        guard
            .ensure_reference(EntityKind::Position, input.position_id.into_inner())
            .await?;

        let now = chrono::Utc::now();
        let employee = employees::ActiveModel {
            company_id: Set(input.company_id.into_inner()),
            department_id: Set(input.department_id.into_inner()),
            position_id: Set(input.position_id.into_inner()),
            project_perm_ids: Set(input.project_perm_ids),
            name: Set(input.name),
            status: Set(input.status.unwrap_or_default()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        info!(employee_id = employee.id, "Employee created");
        Ok(employee)
    }

    /// Updates an employee. Changed references must exist.
    ///
    /// Reports already written keep the name and organization they cached.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the employee does not exist, or
    /// `RepositoryError::Guard` if a changed reference does not exist.
    pub async fn update(
        &self,
        id: EmployeeId,
        input: UpdateEmployeeInput,
    ) -> RepositoryResult<employees::Model> {
        let txn = begin_guarded(&self.db).await?;

        let existing = employees::Entity::find_by_id(id.into_inner())
            .one(&txn)
            .await?
            .ok_or_else(|| RepositoryError::not_found(EntityKind::Employee, id.into_inner()))?;

        let store = SeaStore::new(&txn);
        let guard = IntegrityGuard::new(&store);
        guard
            .ensure_changed_reference(
                EntityKind::Company,
                existing.company_id,
                input.company_id.map(CompanyId::into_inner),
            )
            .await?;
        guard
            .ensure_changed_reference(
                EntityKind::Department,
                existing.department_id,
                input.department_id.map(DepartmentId::into_inner),
            )
            .await?;
        guard
            .ensure_changed_reference(
                EntityKind::Position,
                existing.position_id,
                input.position_id.map(PositionId::into_inner),
            )
            .await?;

        let mut active: employees::ActiveModel = existing.into();
        if let Some(company_id) = input.company_id {
            active.company_id = Set(company_id.into_inner());
        }
        if let Some(department_id) = input.department_id {
            active.department_id = Set(department_id.into_inner());
        }
        if let Some(position_id) = input.position_id {
            active.position_id = Set(position_id.into_inner());
        }
        if let Some(perms) = input.project_perm_ids {
            active.project_perm_ids = Set(perms);
        }
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        active.updated_at = Set(chrono::Utc::now());

        let employee = active.update(&txn).await?;
        txn.commit().await?;

        info!(employee_id = employee.id, "Employee updated");
        Ok(employee)
    }

    /// Deletes an employee with no reports.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Guard` if reports still reference it.
    pub async fn delete(&self, id: EmployeeId) -> RepositoryResult<()> {
        let txn = begin_guarded(&self.db).await?;

        if employees::Entity::find_by_id(id.into_inner())
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(RepositoryError::not_found(EntityKind::Employee, id.into_inner()));
        }

        let store = SeaStore::new(&txn);
        IntegrityGuard::new(&store)
            .ensure_deletable(EntityKind::Employee, id.into_inner())
            .await?;

        employees::Entity::delete_by_id(id.into_inner())
            .exec(&txn)
            .await?;
        txn.commit().await?;

        info!(employee_id = %id, "Employee deleted");
        Ok(())
    }

    /// Flips an employee between active and inactive.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the employee does not exist.
    pub async fn toggle_status(&self, id: EmployeeId) -> RepositoryResult<employees::Model> {
        let existing = self.find_by_id(id).await?;
        let status = existing.status.toggled();

        let mut active: employees::ActiveModel = existing.into();
        active.status = Set(status);
        active.updated_at = Set(chrono::Utc::now());

        let employee = active.update(&self.db).await?;
        info!(employee_id = employee.id, ?status, "Employee status toggled");
        Ok(employee)
    }
}
