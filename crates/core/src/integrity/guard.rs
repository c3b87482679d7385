//! Dependent-count and foreign-key checks.

use serde::Serialize;

use super::error::GuardError;
use crate::store::{EntityKind, EntityStore, ForeignKey};

/// Outcome of a delete check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteCheck {
    /// Whether the row may be deleted.
    pub allowed: bool,
    /// Number of dependents of the first blocking kind.
    pub blocking_count: u64,
    /// First blocking dependent kind, if any.
    #[serde(skip)]
    pub blocked_by: Option<EntityKind>,
}

impl DeleteCheck {
    const fn allowed() -> Self {
        Self {
            allowed: true,
            blocking_count: 0,
            blocked_by: None,
        }
    }
}

/// Foreign keys whose rows block deletion of `kind`, in check order.
const fn blocking_edges(kind: EntityKind) -> &'static [ForeignKey] {
    match kind {
        EntityKind::Company => &[ForeignKey::DepartmentCompany, ForeignKey::EmployeeCompany],
        EntityKind::Department => &[ForeignKey::EmployeeDepartment],
        EntityKind::Position => &[ForeignKey::EmployeePosition],
        EntityKind::ProjectPermission => &[ForeignKey::CommissionProjectPermission],
        EntityKind::CommissionProject => &[ForeignKey::ReportCommissionProject],
        EntityKind::Employee => &[ForeignKey::ReportEmployee],
        EntityKind::Report | EntityKind::User => &[],
    }
}

/// Pre-mutation integrity checks over an [`EntityStore`].
#[derive(Debug)]
pub struct IntegrityGuard<'a, S: EntityStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: EntityStore + ?Sized> IntegrityGuard<'a, S> {
    /// Creates a guard reading from `store`.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Checks whether `kind`/`id` has no dependents.
    ///
    /// A company is checked against departments first and employees second;
    /// the first non-zero count blocks.
    pub async fn can_delete(&self, kind: EntityKind, id: i32) -> Result<DeleteCheck, GuardError> {
        for edge in blocking_edges(kind) {
            let count = self.store.count_references(*edge, id).await?;
            if count > 0 {
                return Ok(DeleteCheck {
                    allowed: false,
                    blocking_count: count,
                    blocked_by: Some(edge.dependent()),
                });
            }
        }
        Ok(DeleteCheck::allowed())
    }

    /// Like [`Self::can_delete`], but a blocked delete is an error.
    pub async fn ensure_deletable(&self, kind: EntityKind, id: i32) -> Result<(), GuardError> {
        let check = self.can_delete(kind, id).await?;
        match check.blocked_by {
            Some(dependent) if !check.allowed => Err(GuardError::HasDependents {
                kind,
                id,
                dependent,
                count: check.blocking_count,
            }),
            _ => Ok(()),
        }
    }

    /// Returns true if a row of `kind` with `id` exists.
    pub async fn validate_foreign_key(&self, kind: EntityKind, id: i32) -> Result<bool, GuardError> {
        Ok(self.store.exists(kind, id).await?)
    }

    /// Like [`Self::validate_foreign_key`], but a missing row is an error.
    pub async fn ensure_reference(&self, kind: EntityKind, id: i32) -> Result<(), GuardError> {
        if self.validate_foreign_key(kind, id).await? {
            Ok(())
        } else {
            Err(GuardError::MissingReference { kind, id })
        }
    }

    /// Validates a foreign key on update, only when a new value is supplied
    /// and it differs from the current one.
    pub async fn ensure_changed_reference(
        &self,
        kind: EntityKind,
        current: i32,
        proposed: Option<i32>,
    ) -> Result<(), GuardError> {
        match proposed {
            Some(id) if id != current => self.ensure_reference(kind, id).await,
            _ => Ok(()),
        }
    }
}
