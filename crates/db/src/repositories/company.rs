//! Company repository.

use commission_core::integrity::IntegrityGuard;
use commission_core::store::EntityKind;
use commission_shared::types::{CompanyId, PageRequest, PageResponse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;

use super::{RepositoryError, RepositoryResult, begin_guarded, fetch_page};
use crate::entities::{companies, sea_orm_active_enums::RecordStatus};
use crate::store::SeaStore;

/// Input for creating a company.
#[derive(Debug, Clone)]
pub struct CreateCompanyInput {
    /// Company name.
    pub name: String,
    /// Initial status, active when absent.
    pub status: Option<RecordStatus>,
}

/// Input for updating a company.
#[derive(Debug, Clone, Default)]
pub struct UpdateCompanyInput {
    /// Company name.
    pub name: Option<String>,
    /// Status.
    pub status: Option<RecordStatus>,
}

/// Filter options for listing companies.
#[derive(Debug, Clone, Default)]
pub struct CompanyFilter {
    /// Substring of the name.
    pub search: Option<String>,
    /// Filter by status.
    pub status: Option<RecordStatus>,
}

/// Company repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CompanyRepository {
    db: DatabaseConnection,
}

impl CompanyRepository {
    /// Creates a new company repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists companies, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &CompanyFilter,
        page: &PageRequest,
    ) -> RepositoryResult<PageResponse<companies::Model>> {
        let mut query = companies::Entity::find();

        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(companies::Column::Name.contains(search));
        }
        if let Some(status) = filter.status {
            query = query.filter(companies::Column::Status.eq(status));
        }

        let query = query.order_by_asc(companies::Column::Id);
        Ok(fetch_page(query, page, &self.db).await?)
    }

    /// Finds a company by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the company does not exist.
    pub async fn find_by_id(&self, id: CompanyId) -> RepositoryResult<companies::Model> {
        companies::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found(EntityKind::Company, id.into_inner()))
    }

    /// Creates a company.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: CreateCompanyInput) -> RepositoryResult<companies::Model> {
        let now = chrono::Utc::now();
        let company = companies::ActiveModel {
            name: Set(input.name),
            status: Set(input.status.unwrap_or_default()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!(company_id = company.id, "Company created");
        Ok(company)
    }

    /// Updates a company.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the company does not exist.
    pub async fn update(
        &self,
        id: CompanyId,
        input: UpdateCompanyInput,
    ) -> RepositoryResult<companies::Model> {
        let existing = self.find_by_id(id).await?;

        let mut active: companies::ActiveModel = existing.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        active.updated_at = Set(chrono::Utc::now());

        let company = active.update(&self.db).await?;
        info!(company_id = company.id, "Company updated");
        Ok(company)
    }

    /// Deletes a company that has no departments and no employees.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the company does not exist,
    /// or `RepositoryError::Guard` if dependents still reference it.
    pub async fn delete(&self, id: CompanyId) -> RepositoryResult<()> {
        let txn = begin_guarded(&self.db).await?;

        if companies::Entity::find_by_id(id.into_inner())
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(RepositoryError::not_found(EntityKind::Company, id.into_inner()));
        }

        let store = SeaStore::new(&txn);
        IntegrityGuard::new(&store)
            .ensure_deletable(EntityKind::Company, id.into_inner())
            .await?;

        companies::Entity::delete_by_id(id.into_inner())
            .exec(&txn)
            .await?;
        txn.commit().await?;

        info!(company_id = %id, "Company deleted");
        Ok(())
    }

    /// Flips a company between active and inactive.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the company does not exist.
    pub async fn toggle_status(&self, id: CompanyId) -> RepositoryResult<companies::Model> {
        let existing = self.find_by_id(id).await?;
        let status = existing.status.toggled();

        let mut active: companies::ActiveModel = existing.into();
        active.status = Set(status);
        active.updated_at = Set(chrono::Utc::now());

        let company = active.update(&self.db).await?;
        info!(company_id = company.id, ?status, "Company status toggled");
        Ok(company)
    }
}
