//! Department repository.

use commission_core::integrity::IntegrityGuard;
use commission_core::store::EntityKind;
use commission_shared::types::{CompanyId, DepartmentId, PageRequest, PageResponse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;

use super::{RepositoryError, RepositoryResult, begin_guarded, fetch_page};
use crate::entities::{departments, sea_orm_active_enums::RecordStatus};
use crate::store::SeaStore;

/// Input for creating a department.
#[derive(Debug, Clone)]
pub struct CreateDepartmentInput {
    /// Owning company.
    pub company_id: CompanyId,
    /// Department name.
    pub name: String,
    /// Initial status, active when absent.
    pub status: Option<RecordStatus>,
}

/// Input for updating a department.
#[derive(Debug, Clone, Default)]
pub struct UpdateDepartmentInput {
    /// Owning company.
    pub company_id: Option<CompanyId>,
    /// Department name.
    pub name: Option<String>,
    /// Status.
    pub status: Option<RecordStatus>,
}

/// Filter options for listing departments.
#[derive(Debug, Clone, Default)]
pub struct DepartmentFilter {
    /// Substring of the name.
    pub search: Option<String>,
    /// Filter by status.
    pub status: Option<RecordStatus>,
    /// Filter by company.
    pub company_id: Option<CompanyId>,
}

/// Department repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct DepartmentRepository {
    db: DatabaseConnection,
}

impl DepartmentRepository {
    /// Creates a new department repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists departments.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &DepartmentFilter,
        page: &PageRequest,
    ) -> RepositoryResult<PageResponse<departments::Model>> {
        let mut query = departments::Entity::find();

        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(departments::Column::Name.contains(search));
        }
        if let Some(status) = filter.status {
            query = query.filter(departments::Column::Status.eq(status));
        }
        if let Some(company_id) = filter.company_id {
            query = query.filter(departments::Column::CompanyId.eq(company_id.into_inner()));
        }

        let query = query.order_by_asc(departments::Column::Id);
        Ok(fetch_page(query, page, &self.db).await?)
    }

    /// Finds a department by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the department does not exist.
    pub async fn find_by_id(&self, id: DepartmentId) -> RepositoryResult<departments::Model> {
        departments::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found(EntityKind::Department, id.into_inner()))
    }

    /// Creates a department under an existing company.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Guard` if the company does not exist.
    pub async fn create(
        &self,
        input: CreateDepartmentInput,
    ) -> RepositoryResult<departments::Model> {
        let txn = begin_guarded(&self.db).await?;

        let store = SeaStore::new(&txn);
        IntegrityGuard::new(&store)
            .ensure_reference(EntityKind::Company, input.company_id.into_inner())
            .await?;

        let now = chrono::Utc::now();
        let department = departments::ActiveModel {
            company_id: Set(input.company_id.into_inner()),
            name: Set(input.name),
            status: Set(input.status.unwrap_or_default()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        info!(
            department_id = department.id,
            company_id = department.company_id,
            "Department created"
        );
        Ok(department)
    }

    /// Updates a department. A changed company must exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the department does not exist,
    /// or `RepositoryError::Guard` if the new company does not exist.
    pub async fn update(
        &self,
        id: DepartmentId,
        input: UpdateDepartmentInput,
    ) -> RepositoryResult<departments::Model> {
        let txn = begin_guarded(&self.db).await?;

        let existing = departments::Entity::find_by_id(id.into_inner())
            .one(&txn)
            .await?
            .ok_or_else(|| RepositoryError::not_found(EntityKind::Department, id.into_inner()))?;

        let store = SeaStore::new(&txn);
        IntegrityGuard::new(&store)
            .ensure_changed_reference(
                EntityKind::Company,
                existing.company_id,
                input.company_id.map(CompanyId::into_inner),
            )
            .await?;

        let mut active: departments::ActiveModel = existing.into();
        if let Some(company_id) = input.company_id {
            active.company_id = Set(company_id.into_inner());
        }
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        active.updated_at = Set(chrono::Utc::now());

        let department = active.update(&txn).await?;
        txn.commit().await?;

        info!(department_id = department.id, "Department updated");
        Ok(department)
    }

    /// Deletes a department no employee belongs to.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Guard` if employees still belong to it.
    pub async fn delete(&self, id: DepartmentId) -> RepositoryResult<()> {
        let txn = begin_guarded(&self.db).await?;

        if departments::Entity::find_by_id(id.into_inner())
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(RepositoryError::not_found(
                EntityKind::Department,
                id.into_inner(),
            ));
        }

        let store = SeaStore::new(&txn);
        IntegrityGuard::new(&store)
            .ensure_deletable(EntityKind::Department, id.into_inner())
            .await?;

        departments::Entity::delete_by_id(id.into_inner())
            .exec(&txn)
            .await?;
        txn.commit().await?;

        info!(department_id = %id, "Department deleted");
        Ok(())
    }

    /// Flips a department between active and inactive.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the department does not exist.
    pub async fn toggle_status(&self, id: DepartmentId) -> RepositoryResult<departments::Model> {
        let existing = self.find_by_id(id).await?;
        let status = existing.status.toggled();

        let mut active: departments::ActiveModel = existing.into();
        active.status = Set(status);
        active.updated_at = Set(chrono::Utc::now());

        let department = active.update(&self.db).await?;
        info!(department_id = department.id, ?status, "Department status toggled");
        Ok(department)
    }
}
