//! Project permission repository.
//!
//! Permissions are the categories commission projects are grouped under.

use commission_core::integrity::IntegrityGuard;
use commission_core::store::EntityKind;
use commission_shared::types::{PageRequest, PageResponse, ProjectPermissionId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;

use super::{RepositoryError, RepositoryResult, begin_guarded, fetch_page};
use crate::entities::{project_permissions, sea_orm_active_enums::RecordStatus};
use crate::store::SeaStore;

/// Input for creating a project permission.
#[derive(Debug, Clone)]
pub struct CreateProjectPermissionInput {
    /// Permission name.
    pub permission: String,
    /// Initial status, active when absent.
    pub status: Option<RecordStatus>,
}

/// Input for updating a project permission.
#[derive(Debug, Clone, Default)]
pub struct UpdateProjectPermissionInput {
    /// Permission name.
    pub permission: Option<String>,
    /// Status.
    pub status: Option<RecordStatus>,
}

/// Filter options for listing project permissions.
#[derive(Debug, Clone, Default)]
pub struct ProjectPermissionFilter {
    /// Substring of the permission name.
    pub search: Option<String>,
    /// Filter by status.
    pub status: Option<RecordStatus>,
}

/// Project permission repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ProjectPermissionRepository {
    db: DatabaseConnection,
}

impl ProjectPermissionRepository {
    /// Creates a new project permission repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists project permissions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &ProjectPermissionFilter,
        page: &PageRequest,
    ) -> RepositoryResult<PageResponse<project_permissions::Model>> {
        let mut query = project_permissions::Entity::find();

        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(project_permissions::Column::Permission.contains(search));
        }
        if let Some(status) = filter.status {
            query = query.filter(project_permissions::Column::Status.eq(status));
        }

        let query = query.order_by_asc(project_permissions::Column::Id);
        Ok(fetch_page(query, page, &self.db).await?)
    }

    /// Finds a project permission by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if it does not exist.
    pub async fn find_by_id(
        &self,
        id: ProjectPermissionId,
    ) -> RepositoryResult<project_permissions::Model> {
        project_permissions::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                RepositoryError::not_found(EntityKind::ProjectPermission, id.into_inner())
            })
    }

    /// Creates a project permission.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        input: CreateProjectPermissionInput,
    ) -> RepositoryResult<project_permissions::Model> {
        let now = chrono::Utc::now();
        let permission = project_permissions::ActiveModel {
            permission: Set(input.permission),
            status: Set(input.status.unwrap_or_default()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!(project_permission_id = permission.id, "Project permission created");
        Ok(permission)
    }

    /// Updates a project permission.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if it does not exist.
    pub async fn update(
        &self,
        id: ProjectPermissionId,
        input: UpdateProjectPermissionInput,
    ) -> RepositoryResult<project_permissions::Model> {
        let mut active: project_permissions::ActiveModel = self.find_by_id(id).await?.into();
        if let Some(permission) = input.permission {
            active.permission = Set(permission);
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        active.updated_at = Set(chrono::Utc::now());

        let permission = active.update(&self.db).await?;
        info!(project_permission_id = permission.id, "Project permission updated");
        Ok(permission)
    }

    /// Deletes a project permission no commission project uses.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Guard` if commission projects still use it.
    pub async fn delete(&self, id: ProjectPermissionId) -> RepositoryResult<()> {
        let txn = begin_guarded(&self.db).await?;

        if project_permissions::Entity::find_by_id(id.into_inner())
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(RepositoryError::not_found(
                EntityKind::ProjectPermission,
                id.into_inner(),
            ));
        }

        let store = SeaStore::new(&txn);
        IntegrityGuard::new(&store)
            .ensure_deletable(EntityKind::ProjectPermission, id.into_inner())
            .await?;

        project_permissions::Entity::delete_by_id(id.into_inner())
            .exec(&txn)
            .await?;
        txn.commit().await?;

        info!(project_permission_id = %id, "Project permission deleted");
        Ok(())
    }

    /// Flips a project permission between active and inactive.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if it does not exist.
    pub async fn toggle_status(
        &self,
        id: ProjectPermissionId,
    ) -> RepositoryResult<project_permissions::Model> {
        let existing = self.find_by_id(id).await?;
        let status = existing.status.toggled();

        let mut active: project_permissions::ActiveModel = existing.into();
        active.status = Set(status);
        active.updated_at = Set(chrono::Utc::now());

        let permission = active.update(&self.db).await?;
        info!(project_permission_id = permission.id, ?status, "Project permission status toggled");
        Ok(permission)
    }
}
