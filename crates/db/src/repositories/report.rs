//! Commission report repository.
//!
//! Writes go through the core report planner inside one transaction, so the
//! employee fields a report caches are copied in the same transaction that
//! stores the row.

use commission_core::report::{ReportDraft, ReportPatch, ReportPlan, ReportPlanner};
use commission_core::scope::Visibility;
use commission_core::store::EntityKind;
use commission_core::summary::{MonthlySummary, SummaryEngine};
use commission_shared::types::{
    CommissionProjectId, CompanyId, DepartmentId, EmployeeId, PageRequest, PageResponse,
    PositionId, ReportId,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;

use super::{RepositoryError, RepositoryResult, begin_guarded, fetch_page};
use crate::entities::{reports, sea_orm_active_enums::RecordStatus};
use crate::store::{SeaStore, id_filter};

/// Filter options for listing reports.
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    /// Substring of the cached employee name.
    pub search: Option<String>,
    /// Filter by status.
    pub status: Option<RecordStatus>,
    /// Filter by employee.
    pub employee_id: Option<EmployeeId>,
    /// Filter by company.
    pub company_id: Option<CompanyId>,
    /// Filter by department.
    pub department_id: Option<DepartmentId>,
    /// Filter by commission project.
    pub commission_project_id: Option<CommissionProjectId>,
    /// Inclusive lower bound, `YYYY-MM-DD`.
    pub start_date: Option<String>,
    /// Inclusive upper bound, `YYYY-MM-DD`.
    pub end_date: Option<String>,
}

fn plan_of(model: &reports::Model) -> ReportPlan {
    ReportPlan {
        date: model.date.clone(),
        employee_id: EmployeeId::new(model.employee_id),
        employee_name: model.employee_name.clone(),
        company_id: CompanyId::new(model.company_id),
        department_id: DepartmentId::new(model.department_id),
        position_id: PositionId::new(model.position_id),
        commission_project_id: CommissionProjectId::new(model.commission_project_id),
        commission_value: model.commission_value,
    }
}

fn new_row(plan: ReportPlan, now: chrono::DateTime<chrono::Utc>) -> reports::ActiveModel {
    reports::ActiveModel {
        date: Set(plan.date),
        employee_id: Set(plan.employee_id.into_inner()),
        employee_name: Set(plan.employee_name),
        company_id: Set(plan.company_id.into_inner()),
        department_id: Set(plan.department_id.into_inner()),
        position_id: Set(plan.position_id.into_inner()),
        commission_project_id: Set(plan.commission_project_id.into_inner()),
        commission_value: Set(plan.commission_value),
        status: Set(RecordStatus::Active),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}

/// Report repository.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists visible reports, newest date first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &ReportFilter,
        visibility: &Visibility,
        page: &PageRequest,
    ) -> RepositoryResult<PageResponse<reports::Model>> {
        let mut query = reports::Entity::find();

        if let Some(ids) = visibility.employee_ids() {
            query = query.filter(id_filter(reports::Column::EmployeeId, ids));
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(reports::Column::EmployeeName.contains(search));
        }
        if let Some(status) = filter.status {
            query = query.filter(reports::Column::Status.eq(status));
        }
        if let Some(id) = filter.employee_id {
            query = query.filter(reports::Column::EmployeeId.eq(id.into_inner()));
        }
        if let Some(id) = filter.company_id {
            query = query.filter(reports::Column::CompanyId.eq(id.into_inner()));
        }
        if let Some(id) = filter.department_id {
            query = query.filter(reports::Column::DepartmentId.eq(id.into_inner()));
        }
        if let Some(id) = filter.commission_project_id {
            query = query.filter(reports::Column::CommissionProjectId.eq(id.into_inner()));
        }
        if let Some(start) = filter.start_date.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(reports::Column::Date.gte(start));
        }
        if let Some(end) = filter.end_date.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(reports::Column::Date.lte(end));
        }

        let query = query
            .order_by_desc(reports::Column::Date)
            .order_by_desc(reports::Column::Id);
        Ok(fetch_page(query, page, &self.db).await?)
    }

    /// Finds a report, treating reports outside `visibility` as missing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the report does not exist or is
    /// not visible.
    pub async fn find_by_id(
        &self,
        id: ReportId,
        visibility: &Visibility,
    ) -> RepositoryResult<reports::Model> {
        reports::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .filter(|r| visibility.allows(EmployeeId::new(r.employee_id)))
            .ok_or_else(|| RepositoryError::not_found(EntityKind::Report, id.into_inner()))
    }

    /// Creates a report for a visible, existing employee.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Report` if the draft is rejected.
    pub async fn create(
        &self,
        draft: &ReportDraft,
        visibility: &Visibility,
    ) -> RepositoryResult<reports::Model> {
        let txn = begin_guarded(&self.db).await?;

        let store = SeaStore::new(&txn);
        let plan = ReportPlanner::new(&store)
            .plan_create(draft, visibility)
            .await?;

        let report = new_row(plan, chrono::Utc::now()).insert(&txn).await?;
        txn.commit().await?;

        info!(
            report_id = report.id,
            employee_id = report.employee_id,
            commission_project_id = report.commission_project_id,
            "Report created"
        );
        Ok(report)
    }

    /// Creates several reports; either all are stored or none.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Report` for an empty batch or the first
    /// rejected draft.
    pub async fn create_batch(
        &self,
        drafts: &[ReportDraft],
        visibility: &Visibility,
    ) -> RepositoryResult<usize> {
        let txn = begin_guarded(&self.db).await?;

        let store = SeaStore::new(&txn);
        let plans = ReportPlanner::new(&store)
            .plan_batch(drafts, visibility)
            .await?;

        let count = plans.len();
        let now = chrono::Utc::now();
        reports::Entity::insert_many(plans.into_iter().map(|plan| new_row(plan, now)))
            .exec(&txn)
            .await?;
        txn.commit().await?;

        info!(count, "Report batch created");
        Ok(count)
    }

    /// Updates a report.
    ///
    /// The cached employee fields are refreshed only when `employee_id`
    /// changes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the report does not exist, or
    /// `RepositoryError::Report` if the patch is rejected.
    pub async fn update(
        &self,
        id: ReportId,
        patch: &ReportPatch,
    ) -> RepositoryResult<reports::Model> {
        let txn = begin_guarded(&self.db).await?;

        let existing = reports::Entity::find_by_id(id.into_inner())
            .one(&txn)
            .await?
            .ok_or_else(|| RepositoryError::not_found(EntityKind::Report, id.into_inner()))?;

        let store = SeaStore::new(&txn);
        let plan = ReportPlanner::new(&store)
            .plan_update(&plan_of(&existing), patch)
            .await?;

        let mut active: reports::ActiveModel = existing.into();
        active.date = Set(plan.date);
        active.employee_id = Set(plan.employee_id.into_inner());
        active.employee_name = Set(plan.employee_name);
        active.company_id = Set(plan.company_id.into_inner());
        active.department_id = Set(plan.department_id.into_inner());
        active.position_id = Set(plan.position_id.into_inner());
        active.commission_project_id = Set(plan.commission_project_id.into_inner());
        active.commission_value = Set(plan.commission_value);
        active.updated_at = Set(chrono::Utc::now());

        let report = active.update(&txn).await?;
        txn.commit().await?;

        info!(report_id = report.id, "Report updated");
        Ok(report)
    }

    /// Deletes a report.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the report does not exist.
    pub async fn delete(&self, id: ReportId) -> RepositoryResult<()> {
        let result = reports::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::not_found(EntityKind::Report, id.into_inner()));
        }

        info!(report_id = %id, "Report deleted");
        Ok(())
    }

    /// Flips a report between active and inactive.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the report does not exist.
    pub async fn toggle_status(&self, id: ReportId) -> RepositoryResult<reports::Model> {
        let existing = self.find_by_id(id, &Visibility::All).await?;
        let status = existing.status.toggled();

        let mut active: reports::ActiveModel = existing.into();
        active.status = Set(status);
        active.updated_at = Set(chrono::Utc::now());

        let report = active.update(&self.db).await?;
        info!(report_id = report.id, ?status, "Report status toggled");
        Ok(report)
    }

    /// Computes the monthly summary visible under `visibility`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Summary` for a missing or malformed month.
    pub async fn monthly_summary(
        &self,
        month: Option<&str>,
        visibility: &Visibility,
    ) -> RepositoryResult<MonthlySummary> {
        let store = SeaStore::new(&self.db);
        Ok(SummaryEngine::new(&store)
            .monthly_summary(month, visibility)
            .await?)
    }
}
