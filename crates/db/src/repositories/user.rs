//! User repository for database operations.

use commission_core::store::EntityKind;
use commission_shared::types::{PageRequest, PageResponse, UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;

use super::{RepositoryError, RepositoryResult, fetch_page};
use crate::entities::{sea_orm_active_enums::RecordStatus, users};

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Unique login name.
    pub username: String,
    /// Display name.
    pub name: String,
    /// Administrator flag.
    pub is_admin: bool,
    /// Scope descriptor.
    pub employee_scope: String,
    /// Initial status, active when absent.
    pub status: Option<RecordStatus>,
}

/// Input for updating a user.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    /// New login name, must stay unique.
    pub username: Option<String>,
    /// New display name.
    pub name: Option<String>,
    /// Grants or revokes admin rights.
    pub is_admin: Option<bool>,
    /// New scope descriptor: empty, `0` or comma-separated ids.
    pub employee_scope: Option<String>,
    /// New status.
    pub status: Option<RecordStatus>,
}

/// Filter options for listing users.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Substring of the username or the display name.
    pub search: Option<String>,
    /// Filter by status.
    pub status: Option<RecordStatus>,
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists users.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &UserFilter,
        page: &PageRequest,
    ) -> RepositoryResult<PageResponse<users::Model>> {
        let mut query = users::Entity::find();

        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(users::Column::Username.contains(search))
                    .add(users::Column::Name.contains(search)),
            );
        }
        if let Some(status) = filter.status {
            query = query.filter(users::Column::Status.eq(status));
        }

        let query = query.order_by_asc(users::Column::Id);
        Ok(fetch_page(query, page, &self.db).await?)
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn find_by_id(&self, id: UserId) -> RepositoryResult<users::Model> {
        users::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found(EntityKind::User, id.into_inner()))
    }

    /// Finds an active user by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_active_by_username(
        &self,
        username: &str,
    ) -> RepositoryResult<Option<users::Model>> {
        Ok(users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .filter(users::Column::Status.eq(RecordStatus::Active))
            .one(&self.db)
            .await?)
    }

    async fn ensure_username_free(&self, username: &str) -> RepositoryResult<()> {
        let taken = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await?
            .is_some();

        if taken {
            return Err(RepositoryError::DuplicateUsername(username.to_string()));
        }
        Ok(())
    }

    /// Creates a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DuplicateUsername` if the username is taken.
    pub async fn create(&self, input: CreateUserInput) -> RepositoryResult<users::Model> {
        self.ensure_username_free(&input.username).await?;

        let now = chrono::Utc::now();
        let user = users::ActiveModel {
            username: Set(input.username),
            name: Set(input.name),
            is_admin: Set(input.is_admin),
            employee_scope: Set(input.employee_scope),
            status: Set(input.status.unwrap_or_default()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!(user_id = user.id, username = %user.username, "User created");
        Ok(user)
    }

    /// Updates a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist, or
    /// `RepositoryError::DuplicateUsername` if a new username is taken.
    pub async fn update(&self, id: UserId, input: UpdateUserInput) -> RepositoryResult<users::Model> {
        let existing = self.find_by_id(id).await?;

        if let Some(username) = input.username.as_deref().filter(|u| *u != existing.username) {
            self.ensure_username_free(username).await?;
        }

        let mut active: users::ActiveModel = existing.into();
        if let Some(username) = input.username {
            active.username = Set(username);
        }
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(is_admin) = input.is_admin {
            active.is_admin = Set(is_admin);
        }
        if let Some(scope) = input.employee_scope {
            active.employee_scope = Set(scope);
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        active.updated_at = Set(chrono::Utc::now());

        let user = active.update(&self.db).await?;
        info!(user_id = user.id, "User updated");
        Ok(user)
    }

    /// Changes only the display name of a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn update_profile(&self, id: UserId, name: String) -> RepositoryResult<users::Model> {
        self.update(
            id,
            UpdateUserInput {
                name: Some(name),
                ..UpdateUserInput::default()
            },
        )
        .await
    }

    /// Deletes a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn delete(&self, id: UserId) -> RepositoryResult<()> {
        let result = users::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::not_found(EntityKind::User, id.into_inner()));
        }

        info!(user_id = %id, "User deleted");
        Ok(())
    }

    /// Flips a user between active and inactive.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn toggle_status(&self, id: UserId) -> RepositoryResult<users::Model> {
        let existing = self.find_by_id(id).await?;
        let status = existing.status.toggled();

        let mut active: users::ActiveModel = existing.into();
        active.status = Set(status);
        active.updated_at = Set(chrono::Utc::now());

        let user = active.update(&self.db).await?;
        info!(user_id = user.id, ?status, "User status toggled");
        Ok(user)
    }
}
