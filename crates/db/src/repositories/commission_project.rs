//! Commission project repository.

use commission_core::integrity::IntegrityGuard;
use commission_core::store::EntityKind;
use commission_shared::types::{CommissionProjectId, PageRequest, PageResponse, ProjectPermissionId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;

use super::{RepositoryError, RepositoryResult, begin_guarded, fetch_page};
use crate::entities::{commission_projects, sea_orm_active_enums::RecordStatus};
use crate::store::SeaStore;

/// Input for creating a commission project.
#[derive(Debug, Clone)]
pub struct CreateCommissionProjectInput {
    /// Display name of the project.
    pub field_name: String,
    /// Permission category.
    pub project_perm_id: ProjectPermissionId,
    /// Initial status, active when absent.
    pub status: Option<RecordStatus>,
}

/// Input for updating a commission project.
#[derive(Debug, Clone, Default)]
pub struct UpdateCommissionProjectInput {
    /// New field name.
    pub field_name: Option<String>,
    /// New permission category.
    pub project_perm_id: Option<ProjectPermissionId>,
    /// New status.
    pub status: Option<RecordStatus>,
}

/// Filter options for listing commission projects.
#[derive(Debug, Clone, Default)]
pub struct CommissionProjectFilter {
    /// Substring of the field name.
    pub search: Option<String>,
    /// Filter by status.
    pub status: Option<RecordStatus>,
    /// Filter by permission category.
    pub project_perm_id: Option<ProjectPermissionId>,
}

/// Commission project repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CommissionProjectRepository {
    db: DatabaseConnection,
}

impl CommissionProjectRepository {
    /// Creates a new commission project repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists commission projects.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &CommissionProjectFilter,
        page: &PageRequest,
    ) -> RepositoryResult<PageResponse<commission_projects::Model>> {
        let mut query = commission_projects::Entity::find();

        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(commission_projects::Column::FieldName.contains(search));
        }
        if let Some(status) = filter.status {
            query = query.filter(commission_projects::Column::Status.eq(status));
        }
        if let Some(perm) = filter.project_perm_id {
            query = query.filter(commission_projects::Column::ProjectPermId.eq(perm.into_inner()));
        }

        let query = query.order_by_asc(commission_projects::Column::Id);
        Ok(fetch_page(query, page, &self.db).await?)
    }

    /// Finds a commission project by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if it does not exist.
    pub async fn find_by_id(
        &self,
        id: CommissionProjectId,
    ) -> RepositoryResult<commission_projects::Model> {
        commission_projects::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                RepositoryError::not_found(EntityKind::CommissionProject, id.into_inner())
            })
    }

    /// Creates a commission project under an existing permission.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Guard` if the permission does not exist.
    pub async fn create(
        &self,
        input: CreateCommissionProjectInput,
    ) -> RepositoryResult<commission_projects::Model> {
        let txn = begin_guarded(&self.db).await?;

        let store = SeaStore::new(&txn);
        IntegrityGuard::new(&store)
            .ensure_reference(
                EntityKind::ProjectPermission,
                input.project_perm_id.into_inner(),
            )
            .await?;

        let now = chrono::Utc::now();
        let project = commission_projects::ActiveModel {
            field_name: Set(input.field_name),
            project_perm_id: Set(input.project_perm_id.into_inner()),
            status: Set(input.status.unwrap_or_default()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        info!(commission_project_id = project.id, "Commission project created");
        Ok(project)
    }

    /// Updates a commission project. A changed permission must exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the project does not exist, or
    /// `RepositoryError::Guard` if the new permission does not exist.
    pub async fn update(
        &self,
        id: CommissionProjectId,
        input: UpdateCommissionProjectInput,
    ) -> RepositoryResult<commission_projects::Model> {
        let txn = begin_guarded(&self.db).await?;

        let existing = commission_projects::Entity::find_by_id(id.into_inner())
            .one(&txn)
            .await?
            .ok_or_else(|| {
                RepositoryError::not_found(EntityKind::CommissionProject, id.into_inner())
            })?;

        let store = SeaStore::new(&txn);
        IntegrityGuard::new(&store)
            .ensure_changed_reference(
                EntityKind::ProjectPermission,
                existing.project_perm_id,
                input.project_perm_id.map(ProjectPermissionId::into_inner),
            )
            .await?;

        let mut active: commission_projects::ActiveModel = existing.into();
        if let Some(field_name) = input.field_name {
            active.field_name = Set(field_name);
        }
        if let Some(perm) = input.project_perm_id {
            active.project_perm_id = Set(perm.into_inner());
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        active.updated_at = Set(chrono::Utc::now());

        let project = active.update(&txn).await?;
        txn.commit().await?;

        info!(commission_project_id = project.id, "Commission project updated");
        Ok(project)
    }

    /// Deletes a commission project no report counts toward.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Guard` if reports still reference it.
    pub async fn delete(&self, id: CommissionProjectId) -> RepositoryResult<()> {
        let txn = begin_guarded(&self.db).await?;

        if commission_projects::Entity::find_by_id(id.into_inner())
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(RepositoryError::not_found(
                EntityKind::CommissionProject,
                id.into_inner(),
            ));
        }

        let store = SeaStore::new(&txn);
        IntegrityGuard::new(&store)
            .ensure_deletable(EntityKind::CommissionProject, id.into_inner())
            .await?;

        commission_projects::Entity::delete_by_id(id.into_inner())
            .exec(&txn)
            .await?;
        txn.commit().await?;

        info!(commission_project_id = %id, "Commission project deleted");
        Ok(())
    }

    /// Flips a commission project between active and inactive.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if it does not exist.
    pub async fn toggle_status(
        &self,
        id: CommissionProjectId,
    ) -> RepositoryResult<commission_projects::Model> {
        let existing = self.find_by_id(id).await?;
        let status = existing.status.toggled();

        let mut active: commission_projects::ActiveModel = existing.into();
        active.status = Set(status);
        active.updated_at = Set(chrono::Utc::now());

        let project = active.update(&self.db).await?;
        info!(commission_project_id = project.id, ?status, "Commission project status toggled");
        Ok(project)
    }
}
