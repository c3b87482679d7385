//! Tests for monthly aggregation.

use std::collections::BTreeSet;

use commission_shared::types::{
    CommissionProjectId, CompanyId, DepartmentId, EmployeeId, PositionId, ReportId,
};
use proptest::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::scope::Visibility;
use crate::store::memory::{MemoryStore, plan};

/// Employees 1 (Alice) and 2 (Bob), projects 1 (Cards), 2 (Loans), 3 (Auto).
fn fixture() -> MemoryStore {
    let store = MemoryStore::new();
    store.add_company(1, "Acme");
    store.add_department(1, 1, "Sales");
    store.add_position(1, "Clerk");
    store.add_permission(1, "Sales");
    store.add_project(1, 1, "Cards");
    store.add_project(2, 1, "Loans");
    store.add_project(3, 1, "Auto");
    store.add_employee(1, "Alice", 1, 1, 1);
    store.add_employee(2, "Bob", 1, 1, 1);
    store
}

fn three_reports() -> MemoryStore {
    let store = fixture();
    let alice = store.find(1);
    let bob = store.find(2);
    store.insert_report(1, plan("2024-01-15", &alice, 1, dec!(100)));
    store.insert_report(2, plan("2024-01-15", &alice, 2, dec!(200)));
    store.insert_report(3, plan("2024-01-16", &bob, 3, dec!(150)));
    store
}

fn totals(summary: &MonthlySummary) -> Vec<(i32, i32, Decimal)> {
    summary
        .summaries
        .iter()
        .map(|r| {
            (
                r.employee_id.into_inner(),
                r.commission_project_id.into_inner(),
                r.total_value,
            )
        })
        .collect()
}

fn line(report: i32, date: &str, employee: i32, name: &str, project: i32, value: Decimal) -> ReportLine {
    ReportLine {
        report_id: ReportId::new(report),
        date: date.to_string(),
        employee_id: EmployeeId::new(employee),
        employee_name: name.to_string(),
        company_id: CompanyId::new(1),
        company_name: Some("Acme".to_string()),
        department_id: DepartmentId::new(1),
        department_name: Some("Sales".to_string()),
        position_id: PositionId::new(1),
        position_name: Some("Clerk".to_string()),
        commission_project_id: CommissionProjectId::new(project),
        project_name: Some(format!("Project {project}")),
        commission_value: value,
    }
}

// ============================================================================
// Month parsing
// ============================================================================

#[rstest]
#[case("2024-01", "2024-01-01", "2024-01-31")]
#[case("2024-02", "2024-02-01", "2024-02-29")]
#[case("2023-02", "2023-02-01", "2023-02-28")]
#[case("2024-04", "2024-04-01", "2024-04-30")]
#[case("2024-12", "2024-12-01", "2024-12-31")]
fn test_year_month_range(#[case] month: &str, #[case] start: &str, #[case] end: &str) {
    let parsed = YearMonth::parse(month).unwrap();
    assert_eq!(parsed.label(), month);
    assert_eq!(parsed.range().start_string(), start);
    assert_eq!(parsed.range().end_string(), end);
}

#[rstest]
#[case("2024-13")]
#[case("January")]
#[case("2024-01-15")]
#[case("2024")]
#[case("2024-1")]
#[case(" 2024-01")]
#[case("+2024-01")]
#[case("2024-01 ")]
fn test_year_month_invalid(#[case] month: &str) {
    assert!(matches!(
        YearMonth::parse(month),
        Err(SummaryError::InvalidMonth(_))
    ));
}

// ============================================================================
// Engine
// ============================================================================

#[tokio::test]
async fn test_three_report_example() {
    let store = three_reports();
    let summary = SummaryEngine::new(&store)
        .monthly_summary(Some("2024-01"), &Visibility::All)
        .await
        .unwrap();

    assert_eq!(summary.month, "2024-01");
    assert_eq!(summary.start_date, "2024-01-01");
    assert_eq!(summary.end_date, "2024-01-31");
    // Alice/Cards, Alice/Loans, Bob/Auto
    assert_eq!(
        totals(&summary),
        vec![(1, 1, dec!(100)), (1, 2, dec!(200)), (2, 3, dec!(150))]
    );
    assert_eq!(summary.summaries[0].project_name.as_deref(), Some("Cards"));
    assert_eq!(summary.summaries[0].company_name.as_deref(), Some("Acme"));
}

#[tokio::test]
async fn test_summary_is_idempotent() {
    let store = three_reports();
    let engine = SummaryEngine::new(&store);

    let first = engine
        .monthly_summary(Some("2024-01"), &Visibility::All)
        .await
        .unwrap();
    let second = engine
        .monthly_summary(Some("2024-01"), &Visibility::All)
        .await
        .unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_visibility_filters_rows() {
    let store = three_reports();
    let engine = SummaryEngine::new(&store);
    let only_bob = Visibility::Only([EmployeeId::new(2)].into_iter().collect::<BTreeSet<_>>());

    let all = engine
        .monthly_summary(Some("2024-01"), &Visibility::All)
        .await
        .unwrap();
    let filtered = engine
        .monthly_summary(Some("2024-01"), &only_bob)
        .await
        .unwrap();

    assert_eq!(totals(&filtered), vec![(2, 3, dec!(150))]);
    assert_eq!(filtered.summaries[0], all.summaries[2]);
}

#[tokio::test]
async fn test_empty_visibility_short_circuits() {
    let store = three_reports();
    let summary = SummaryEngine::new(&store)
        .monthly_summary(Some("2024-01"), &Visibility::nobody())
        .await
        .unwrap();

    assert!(summary.summaries.is_empty());
    assert_eq!(summary.end_date, "2024-01-31");
}

#[tokio::test]
async fn test_month_required() {
    let store = fixture();
    let engine = SummaryEngine::new(&store);

    for month in [None, Some("")] {
        let err = engine.monthly_summary(month, &Visibility::All).await.unwrap_err();
        assert!(matches!(err, SummaryError::MonthRequired));
        assert_eq!(err.to_string(), "month required");
    }
}

#[tokio::test]
async fn test_invalid_month_is_validation_error() {
    let store = fixture();
    let err = SummaryEngine::new(&store)
        .monthly_summary(Some("2024-1x"), &Visibility::All)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "invalid date format");
    let app: commission_shared::AppError = err.into();
    assert_eq!(app.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_inactive_and_out_of_month_reports_are_excluded() {
    let store = three_reports();
    let alice = store.find(1);
    store.insert_report(4, plan("2024-01-20", &alice, 1, dec!(999)));
    store.deactivate_report(4);
    store.insert_report(5, plan("2024-02-01", &alice, 1, dec!(5)));
    store.insert_report(6, plan("2023-12-31", &alice, 1, dec!(7)));
    store.insert_report(7, plan("2024-01-31", &alice, 1, dec!(-25.5)));

    let summary = SummaryEngine::new(&store)
        .monthly_summary(Some("2024-01"), &Visibility::All)
        .await
        .unwrap();

    assert_eq!(summary.summaries[0].total_value, dec!(74.5));
}

#[tokio::test]
async fn test_missing_join_gives_null_name() {
    let store = three_reports();
    store.remove_department(1);

    let summary = SummaryEngine::new(&store)
        .monthly_summary(Some("2024-01"), &Visibility::All)
        .await
        .unwrap();

    assert_eq!(summary.summaries.len(), 3);
    assert!(summary.summaries.iter().all(|r| r.department_name.is_none()));
}

#[tokio::test]
async fn test_cached_employee_name_orders_rows() {
    let store = three_reports();
    // Reports keep the name they were written with.
    store.rename_employee(1, "Zed");

    let summary = SummaryEngine::new(&store)
        .monthly_summary(Some("2024-01"), &Visibility::All)
        .await
        .unwrap();
    assert_eq!(summary.summaries[0].employee_name, "Alice");
}

// ============================================================================
// Pure aggregation
// ============================================================================

#[test]
fn test_summarize_orders_missing_project_name_first() {
    let mut unnamed = line(1, "2024-01-02", 1, "Alice", 9, dec!(1));
    unnamed.project_name = None;
    let named = line(2, "2024-01-02", 1, "Alice", 1, dec!(1));

    let rows = summarize(vec![named, unnamed]);
    assert_eq!(rows[0].commission_project_id.into_inner(), 9);
    assert_eq!(rows[1].commission_project_id.into_inner(), 1);
}

#[test]
fn test_summarize_breaks_name_ties_by_id() {
    let rows = summarize(vec![
        line(1, "2024-01-02", 7, "Sam", 1, dec!(1)),
        line(2, "2024-01-02", 3, "Sam", 1, dec!(1)),
    ]);
    assert_eq!(rows[0].employee_id.into_inner(), 3);
    assert_eq!(rows[1].employee_id.into_inner(), 7);
}

#[test]
fn test_summarize_takes_display_fields_from_latest_line() {
    let mut old = line(5, "2024-01-03", 1, "Alice", 1, dec!(10));
    old.department_id = DepartmentId::new(1);
    let mut new = line(2, "2024-01-09", 1, "Alicia", 1, dec!(20));
    new.department_id = DepartmentId::new(4);

    let rows = summarize(vec![new, old]);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].employee_name, "Alicia");
    assert_eq!(rows[0].department_id, DepartmentId::new(4));
    assert_eq!(rows[0].total_value, dec!(30));
}

proptest! {
    #[test]
    fn test_summarize_preserves_total(
        entries in prop::collection::vec((1i32..5, 1i32..4, -10_000i64..10_000), 0..40)
    ) {
        let lines: Vec<ReportLine> = entries
            .iter()
            .enumerate()
            .map(|(i, (employee, project, cents))| {
                let id = i32::try_from(i).unwrap();
                line(id, "2024-01-10", *employee, &format!("E{employee}"), *project, Decimal::new(*cents, 2))
            })
            .collect();
        let expected: Decimal = lines.iter().map(|l| l.commission_value).sum();

        let rows = summarize(lines);
        let total: Decimal = rows.iter().map(|r| r.total_value).sum();
        prop_assert_eq!(total, expected);

        // One row per distinct pair.
        let pairs: BTreeSet<(i32, i32)> = entries.iter().map(|(e, p, _)| (*e, *p)).collect();
        prop_assert_eq!(rows.len(), pairs.len());
    }

    #[test]
    fn test_summarize_ignores_input_order(
        entries in prop::collection::vec((1i32..4, 1i32..3, 0i64..1_000), 1..20)
    ) {
        let lines: Vec<ReportLine> = entries
            .iter()
            .enumerate()
            .map(|(i, (employee, project, value))| {
                let id = i32::try_from(i).unwrap();
                line(id, "2024-01-10", *employee, &format!("E{employee}"), *project, Decimal::from(*value))
            })
            .collect();
        let mut reversed = lines.clone();
        reversed.reverse();

        prop_assert_eq!(summarize(lines), summarize(reversed));
    }
}
