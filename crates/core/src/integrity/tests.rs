//! Tests for delete blocking and reference validation.

use rstest::rstest;
use rust_decimal_macros::dec;

use super::*;
use crate::store::EntityKind;
use crate::store::memory::{MemoryStore, plan};

/// Company 1 with department 1 and one employee; company 2 with a department
/// only; company 3 empty.
fn fixture() -> MemoryStore {
    let store = MemoryStore::new();
    store.add_company(1, "Acme");
    store.add_company(2, "Globex");
    store.add_company(3, "Initech");
    store.add_department(1, 1, "Sales");
    store.add_department(2, 2, "Support");
    store.add_department(3, 1, "Empty");
    store.add_position(1, "Clerk");
    store.add_position(2, "Unused");
    store.add_permission(1, "Sales");
    store.add_permission(2, "Unused");
    store.add_project(1, 1, "Cards");
    store.add_project(2, 1, "Unused");
    store.add_employee(1, "Alice", 1, 1, 1);
    store.add_employee(2, "Bob", 1, 1, 1);
    store
}

#[tokio::test]
async fn test_department_with_employees_is_blocked() {
    let store = fixture();
    let guard = IntegrityGuard::new(&store);

    let check = guard.can_delete(EntityKind::Department, 1).await.unwrap();
    assert!(!check.allowed);
    assert_eq!(check.blocking_count, 2);
    assert_eq!(check.blocked_by, Some(EntityKind::Employee));

    // Nothing was removed.
    assert!(guard.validate_foreign_key(EntityKind::Department, 1).await.unwrap());
}

#[tokio::test]
async fn test_department_deletable_after_employees_are_gone() {
    let store = MemoryStore::new();
    store.add_company(1, "Acme");
    store.add_department(1, 1, "Sales");
    let guard = IntegrityGuard::new(&store);

    let check = guard.can_delete(EntityKind::Department, 1).await.unwrap();
    assert!(check.allowed);
    assert_eq!(check.blocking_count, 0);
    assert!(guard.ensure_deletable(EntityKind::Department, 1).await.is_ok());
}

#[tokio::test]
async fn test_company_checks_departments_first() {
    let store = fixture();
    let guard = IntegrityGuard::new(&store);

    let check = guard.can_delete(EntityKind::Company, 1).await.unwrap();
    assert!(!check.allowed);
    assert_eq!(check.blocked_by, Some(EntityKind::Department));
    assert_eq!(check.blocking_count, 2);
}

#[tokio::test]
async fn test_company_blocked_by_department_alone() {
    let store = fixture();
    let guard = IntegrityGuard::new(&store);

    let check = guard.can_delete(EntityKind::Company, 2).await.unwrap();
    assert!(!check.allowed);
    assert_eq!(check.blocking_count, 1);
}

#[tokio::test]
async fn test_company_blocked_by_employees_without_departments() {
    let store = MemoryStore::new();
    store.add_company(5, "Solo");
    store.add_employee(1, "Orphan", 5, 99, 99);
    let guard = IntegrityGuard::new(&store);

    let check = guard.can_delete(EntityKind::Company, 5).await.unwrap();
    assert_eq!(check.blocked_by, Some(EntityKind::Employee));
    assert_eq!(check.blocking_count, 1);
}

#[rstest]
#[case(EntityKind::Company, 3, true)]
#[case(EntityKind::Department, 3, true)]
#[case(EntityKind::Position, 1, false)]
#[case(EntityKind::Position, 2, true)]
#[case(EntityKind::ProjectPermission, 1, false)]
#[case(EntityKind::ProjectPermission, 2, true)]
#[case(EntityKind::CommissionProject, 2, true)]
#[case(EntityKind::Employee, 2, true)]
#[case(EntityKind::User, 1, true)]
#[case(EntityKind::Report, 1, true)]
#[tokio::test]
async fn test_can_delete_table(#[case] kind: EntityKind, #[case] id: i32, #[case] allowed: bool) {
    let store = fixture();
    let check = IntegrityGuard::new(&store).can_delete(kind, id).await.unwrap();
    assert_eq!(check.allowed, allowed);
}

#[tokio::test]
async fn test_reports_block_employee_and_project() {
    let store = fixture();
    let alice = store.find(1);
    store.insert_report(1, plan("2024-01-05", &alice, 1, dec!(10)));
    let guard = IntegrityGuard::new(&store);

    let employee = guard.can_delete(EntityKind::Employee, 1).await.unwrap();
    assert!(!employee.allowed);
    assert_eq!(employee.blocked_by, Some(EntityKind::Report));

    let project = guard.can_delete(EntityKind::CommissionProject, 1).await.unwrap();
    assert!(!project.allowed);
}

#[tokio::test]
async fn test_inactive_dependents_still_block() {
    let store = fixture();
    let alice = store.find(1);
    store.insert_report(1, plan("2024-01-05", &alice, 1, dec!(10)));
    store.deactivate_report(1);

    let check = IntegrityGuard::new(&store)
        .can_delete(EntityKind::Employee, 1)
        .await
        .unwrap();
    assert!(!check.allowed);
}

#[tokio::test]
async fn test_ensure_deletable_reports_conflict() {
    let store = fixture();
    let err = IntegrityGuard::new(&store)
        .ensure_deletable(EntityKind::Position, 1)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        GuardError::HasDependents { kind: EntityKind::Position, id: 1, count: 2, .. }
    ));
    let app: commission_shared::AppError = err.into();
    assert_eq!(app.status_code(), 409);
}

#[tokio::test]
async fn test_validate_foreign_key() {
    let store = fixture();
    let guard = IntegrityGuard::new(&store);

    assert!(guard.validate_foreign_key(EntityKind::Company, 1).await.unwrap());
    assert!(!guard.validate_foreign_key(EntityKind::Company, 42).await.unwrap());
    assert!(!guard.validate_foreign_key(EntityKind::Position, 42).await.unwrap());
}

#[tokio::test]
async fn test_ensure_reference_names_kind_and_id() {
    let store = fixture();
    let err = IntegrityGuard::new(&store)
        .ensure_reference(EntityKind::ProjectPermission, 9)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "project permission 9 does not exist");
    let app: commission_shared::AppError = err.into();
    assert_eq!(app.error_code(), "INVALID_REFERENCE");
}

#[tokio::test]
async fn test_ensure_changed_reference_skips_unchanged() {
    let store = fixture();
    let guard = IntegrityGuard::new(&store);

    // Current value is never re-validated, even if it has since vanished.
    store.remove_department(3);
    assert!(guard
        .ensure_changed_reference(EntityKind::Department, 3, Some(3))
        .await
        .is_ok());
    assert!(guard
        .ensure_changed_reference(EntityKind::Department, 3, None)
        .await
        .is_ok());
    assert!(guard
        .ensure_changed_reference(EntityKind::Department, 3, Some(2))
        .await
        .is_ok());
    assert!(guard
        .ensure_changed_reference(EntityKind::Department, 3, Some(404))
        .await
        .is_err());
}
