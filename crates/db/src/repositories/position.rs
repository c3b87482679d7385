//! Position repository.

use commission_core::integrity::IntegrityGuard;
use commission_core::store::EntityKind;
use commission_shared::types::{PageRequest, PageResponse, PositionId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;

use super::{RepositoryError, RepositoryResult, begin_guarded, fetch_page};
use crate::entities::{positions, sea_orm_active_enums::RecordStatus};
use crate::store::SeaStore;

/// Input for creating a position.
#[derive(Debug, Clone)]
pub struct CreatePositionInput {
    /// Position name.
    pub name: String,
    /// Initial status, active when absent.
    pub status: Option<RecordStatus>,
}

/// Input for updating a position.
#[derive(Debug, Clone, Default)]
pub struct UpdatePositionInput {
    /// Position name.
    pub name: Option<String>,
    /// Status.
    pub status: Option<RecordStatus>,
}

/// Filter options for listing positions.
#[derive(Debug, Clone, Default)]
pub struct PositionFilter {
    /// Substring of the name.
    pub search: Option<String>,
    /// Filter by status.
    pub status: Option<RecordStatus>,
}

/// Position repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct PositionRepository {
    db: DatabaseConnection,
}

impl PositionRepository {
    /// Creates a new position repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists positions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &PositionFilter,
        page: &PageRequest,
    ) -> RepositoryResult<PageResponse<positions::Model>> {
        let mut query = positions::Entity::find();

        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(positions::Column::Name.contains(search));
        }
        if let Some(status) = filter.status {
            query = query.filter(positions::Column::Status.eq(status));
        }

        let query = query.order_by_asc(positions::Column::Id);
        Ok(fetch_page(query, page, &self.db).await?)
    }

    /// Finds a position by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the position does not exist.
    pub async fn find_by_id(&self, id: PositionId) -> RepositoryResult<positions::Model> {
        positions::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found(EntityKind::Position, id.into_inner()))
    }

    /// Creates a position.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: CreatePositionInput) -> RepositoryResult<positions::Model> {
        let now = chrono::Utc::now();
        let position = positions::ActiveModel {
            name: Set(input.name),
            status: Set(input.status.unwrap_or_default()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!(position_id = position.id, "Position created");
        Ok(position)
    }

    /// Updates a position.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the position does not exist.
    pub async fn update(
        &self,
        id: PositionId,
        input: UpdatePositionInput,
    ) -> RepositoryResult<positions::Model> {
        let mut active: positions::ActiveModel = self.find_by_id(id).await?.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        active.updated_at = Set(chrono::Utc::now());

        let position = active.update(&self.db).await?;
        info!(position_id = position.id, "Position updated");
        Ok(position)
    }

    /// Deletes a position no employee holds.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Guard` if employees still hold it.
    pub async fn delete(&self, id: PositionId) -> RepositoryResult<()> {
        let txn = begin_guarded(&self.db).await?;

        if positions::Entity::find_by_id(id.into_inner())
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(RepositoryError::not_found(EntityKind::Position, id.into_inner()));
        }

        let store = SeaStore::new(&txn);
        IntegrityGuard::new(&store)
            .ensure_deletable(EntityKind::Position, id.into_inner())
            .await?;

        positions::Entity::delete_by_id(id.into_inner())
            .exec(&txn)
            .await?;
        txn.commit().await?;

        info!(position_id = %id, "Position deleted");
        Ok(())
    }

    /// Flips a position between active and inactive.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the position does not exist.
    pub async fn toggle_status(&self, id: PositionId) -> RepositoryResult<positions::Model> {
        let existing = self.find_by_id(id).await?;
        let status = existing.status.toggled();

        let mut active: positions::ActiveModel = existing.into();
        active.status = Set(status);
        active.updated_at = Set(chrono::Utc::now());

        let position = active.update(&self.db).await?;
        info!(position_id = position.id, ?status, "Position status toggled");
        Ok(position)
    }
}
