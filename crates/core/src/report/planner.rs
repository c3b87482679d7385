//! Report planner.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use super::error::ReportError;
use super::types::{ReportDraft, ReportPatch, ReportPlan};
use crate::integrity::{GuardError, IntegrityGuard};
use crate::scope::Visibility;
use crate::store::{EmployeeSnapshot, EntityKind, EntityStore};
use crate::summary::DATE_FORMAT;

/// Validates a report date.
///
/// The date must be a real calendar day written exactly as `YYYY-MM-DD`, so
/// that string comparison on stored dates matches date order.
///
/// # Errors
///
/// Returns `ReportError::InvalidDate` otherwise.
pub fn validate_date(date: &str) -> Result<NaiveDate, ReportError> {
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .ok()
        .filter(|parsed| parsed.format(DATE_FORMAT).to_string() == date)
        .ok_or_else(|| ReportError::InvalidDate(date.to_string()))
}

/// Largest number of decimals a stored commission value keeps.
pub const VALUE_SCALE: u32 = 2;

/// Number of integer digits a stored commission value may have.
pub const VALUE_INTEGER_DIGITS: u32 = 13;

/// Validates a commission value against the stored `NUMERIC(15, 2)` column.
///
/// Trailing zeros do not count toward the scale, so `1.500` is accepted.
///
/// # Errors
///
/// Returns `ReportError::InvalidValue` for more than two decimals or more
/// than thirteen integer digits.
pub fn validate_value(value: Decimal) -> Result<Decimal, ReportError> {
    let limit = Decimal::from(10_i64.pow(VALUE_INTEGER_DIGITS));
    if value.normalize().scale() > VALUE_SCALE || value.abs() >= limit {
        return Err(ReportError::InvalidValue(value));
    }
    Ok(value)
}

/// Plans report writes against an [`EntityStore`].
#[derive(Debug)]
pub struct ReportPlanner<'a, S: EntityStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: EntityStore + ?Sized> ReportPlanner<'a, S> {
    /// Creates a planner reading from `store`.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Plans a new report.
    ///
    /// The employee must be visible to the caller and exist; the commission
    /// project must exist. The employee's name, company, department and
    /// position are copied onto the plan.
    pub async fn plan_create(
        &self,
        draft: &ReportDraft,
        visibility: &Visibility,
    ) -> Result<ReportPlan, ReportError> {
        validate_date(&draft.date)?;
        validate_value(draft.commission_value)?;

        if !visibility.allows(draft.employee_id) {
            return Err(ReportError::NotVisible(draft.employee_id));
        }

        let employee = self.load_employee(draft.employee_id.into_inner()).await?;
        IntegrityGuard::new(self.store)
            .ensure_reference(
                EntityKind::CommissionProject,
                draft.commission_project_id.into_inner(),
            )
            .await?;

        Ok(ReportPlan {
            date: draft.date.clone(),
            employee_id: employee.id,
            employee_name: employee.name,
            company_id: employee.company_id,
            department_id: employee.department_id,
            position_id: employee.position_id,
            commission_project_id: draft.commission_project_id,
            commission_value: draft.commission_value,
        })
    }

    /// Plans an update of an existing report.
    ///
    /// The cached employee fields are refreshed only when the report is
    /// re-pointed to a different employee.
    pub async fn plan_update(
        &self,
        current: &ReportPlan,
        patch: &ReportPatch,
    ) -> Result<ReportPlan, ReportError> {
        let mut next = current.clone();

        if let Some(date) = &patch.date {
            validate_date(date)?;
            next.date.clone_from(date);
        }
        if let Some(value) = patch.commission_value {
            next.commission_value = validate_value(value)?;
        }

        if let Some(employee_id) = patch.employee_id.filter(|id| *id != current.employee_id) {
            let employee = self.load_employee(employee_id.into_inner()).await?;
            debug!(
                from = %current.employee_id,
                to = %employee.id,
                "Report re-pointed, refreshing cached employee fields"
            );
            next.employee_id = employee.id;
            next.employee_name = employee.name;
            next.company_id = employee.company_id;
            next.department_id = employee.department_id;
            next.position_id = employee.position_id;
        }

        IntegrityGuard::new(self.store)
            .ensure_changed_reference(
                EntityKind::CommissionProject,
                current.commission_project_id.into_inner(),
                patch.commission_project_id.map(|id| id.into_inner()),
            )
            .await?;
        if let Some(project) = patch.commission_project_id {
            next.commission_project_id = project;
        }

        Ok(next)
    }

    /// Plans a batch of new reports.
    ///
    /// Every draft is planned before anything is written; the first failing
    /// draft fails the whole batch.
    pub async fn plan_batch(
        &self,
        drafts: &[ReportDraft],
        visibility: &Visibility,
    ) -> Result<Vec<ReportPlan>, ReportError> {
        if drafts.is_empty() {
            return Err(ReportError::EmptyBatch);
        }

        let mut plans = Vec::with_capacity(drafts.len());
        for draft in drafts {
            plans.push(self.plan_create(draft, visibility).await?);
        }
        Ok(plans)
    }

    async fn load_employee(&self, id: i32) -> Result<EmployeeSnapshot, ReportError> {
        self.store
            .find_employee(id.into())
            .await?
            .ok_or(ReportError::Guard(GuardError::MissingReference {
                kind: EntityKind::Employee,
                id,
            }))
    }
}
