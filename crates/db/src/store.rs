//! `EntityStore` implementation over a SeaORM connection.
//!
//! Works on a plain connection as well as inside a transaction, so guarded
//! writes can run their checks on the same transaction as the write.

use std::collections::BTreeSet;

use async_trait::async_trait;
use commission_core::scope::Scope;
use commission_core::store::{
    EmployeeSnapshot, EntityKind, EntityStore, ForeignKey, StoreError, StoreResult,
};
use commission_core::summary::{DateRange, ReportLine};
use commission_shared::types::{
    CommissionProjectId, CompanyId, DepartmentId, EmployeeId, PositionId, ReportId, UserId,
};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, FromQueryResult, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};

use crate::entities::{
    commission_projects, companies, departments, employees, positions, project_permissions,
    reports, sea_orm_active_enums::RecordStatus, users,
};

/// Shortest run of consecutive ids rendered as a `BETWEEN` range.
const MIN_RANGE_RUN: i64 = 3;

/// Restricts `column` to the given employee ids.
///
/// Consecutive ids collapse into `BETWEEN` ranges, so a `"0"` snapshot of a
/// serially keyed table binds a few values rather than one per employee.
/// Isolated ids still bind one value each; an explicit scope listing more
/// isolated ids than the engine's bind limit fails with a database error.
pub(crate) fn id_filter<C: ColumnTrait>(column: C, ids: &BTreeSet<EmployeeId>) -> Condition {
    let mut condition = Condition::any();
    let mut singles = Vec::new();
    let mut ranges = 0_usize;

    for (first, last) in id_runs(ids) {
        if i64::from(last) - i64::from(first) + 1 >= MIN_RANGE_RUN {
            condition = condition.add(column.between(first, last));
            ranges += 1;
        } else {
            singles.extend(first..=last);
        }
    }
    if !singles.is_empty() || ranges == 0 {
        condition = condition.add(column.is_in(singles));
    }
    condition
}

/// Splits sorted ids into inclusive runs of consecutive values.
fn id_runs(ids: &BTreeSet<EmployeeId>) -> Vec<(i32, i32)> {
    let mut runs: Vec<(i32, i32)> = Vec::new();
    for id in ids.iter().map(|id| id.into_inner()) {
        match runs.last_mut() {
            Some((_, last)) if last.checked_add(1) == Some(id) => *last = id,
            _ => runs.push((id, id)),
        }
    }
    runs
}

/// Store reads backed by `SeaORM`.
#[derive(Debug)]
pub struct SeaStore<'c, C: ConnectionTrait> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> SeaStore<'c, C> {
    /// Wraps a connection or transaction.
    #[must_use]
    pub const fn new(conn: &'c C) -> Self {
        Self { conn }
    }
}

fn backend(err: DbErr) -> StoreError {
    StoreError::Backend(err.to_string())
}

#[derive(Debug, FromQueryResult)]
struct ReportLineRow {
    id: i32,
    date: String,
    employee_id: i32,
    employee_name: String,
    company_id: i32,
    company_name: Option<String>,
    department_id: i32,
    department_name: Option<String>,
    position_id: i32,
    position_name: Option<String>,
    commission_project_id: i32,
    project_name: Option<String>,
    commission_value: Decimal,
}

impl From<ReportLineRow> for ReportLine {
    fn from(row: ReportLineRow) -> Self {
        Self {
            report_id: ReportId::new(row.id),
            date: row.date,
            employee_id: EmployeeId::new(row.employee_id),
            employee_name: row.employee_name,
            company_id: CompanyId::new(row.company_id),
            company_name: row.company_name,
            department_id: DepartmentId::new(row.department_id),
            department_name: row.department_name,
            position_id: PositionId::new(row.position_id),
            position_name: row.position_name,
            commission_project_id: CommissionProjectId::new(row.commission_project_id),
            project_name: row.project_name,
            commission_value: row.commission_value,
        }
    }
}

impl From<employees::Model> for EmployeeSnapshot {
    fn from(model: employees::Model) -> Self {
        Self {
            id: EmployeeId::new(model.id),
            name: model.name,
            company_id: CompanyId::new(model.company_id),
            department_id: DepartmentId::new(model.department_id),
            position_id: PositionId::new(model.position_id),
        }
    }
}

#[async_trait]
impl<C: ConnectionTrait> EntityStore for SeaStore<'_, C> {
    async fn exists(&self, kind: EntityKind, id: i32) -> StoreResult<bool> {
        let conn = self.conn;
        let count = match kind {
            EntityKind::Company => companies::Entity::find_by_id(id).count(conn).await,
            EntityKind::Department => departments::Entity::find_by_id(id).count(conn).await,
            EntityKind::Position => positions::Entity::find_by_id(id).count(conn).await,
            EntityKind::ProjectPermission => {
                project_permissions::Entity::find_by_id(id).count(conn).await
            }
            EntityKind::CommissionProject => {
                commission_projects::Entity::find_by_id(id).count(conn).await
            }
            EntityKind::Employee => employees::Entity::find_by_id(id).count(conn).await,
            EntityKind::Report => reports::Entity::find_by_id(id).count(conn).await,
            EntityKind::User => users::Entity::find_by_id(id).count(conn).await,
        }
        .map_err(backend)?;

        Ok(count > 0)
    }

    async fn count_references(&self, fk: ForeignKey, id: i32) -> StoreResult<u64> {
        let conn = self.conn;
        match fk {
            ForeignKey::DepartmentCompany => {
                departments::Entity::find()
                    .filter(departments::Column::CompanyId.eq(id))
                    .count(conn)
                    .await
            }
            ForeignKey::EmployeeCompany => {
                employees::Entity::find()
                    .filter(employees::Column::CompanyId.eq(id))
                    .count(conn)
                    .await
            }
            ForeignKey::EmployeeDepartment => {
                employees::Entity::find()
                    .filter(employees::Column::DepartmentId.eq(id))
                    .count(conn)
                    .await
            }
            ForeignKey::EmployeePosition => {
                employees::Entity::find()
                    .filter(employees::Column::PositionId.eq(id))
                    .count(conn)
                    .await
            }
            ForeignKey::CommissionProjectPermission => {
                commission_projects::Entity::find()
                    .filter(commission_projects::Column::ProjectPermId.eq(id))
                    .count(conn)
                    .await
            }
            ForeignKey::ReportEmployee => {
                reports::Entity::find()
                    .filter(reports::Column::EmployeeId.eq(id))
                    .count(conn)
                    .await
            }
            ForeignKey::ReportCommissionProject => {
                reports::Entity::find()
                    .filter(reports::Column::CommissionProjectId.eq(id))
                    .count(conn)
                    .await
            }
        }
        .map_err(backend)
    }

    async fn employee_scope(&self, user: UserId) -> StoreResult<Option<Scope>> {
        let found = users::Entity::find_by_id(user.into_inner())
            .one(self.conn)
            .await
            .map_err(backend)?;

        Ok(found.map(|u| Scope::parse(&u.employee_scope)))
    }

    async fn employee_ids(&self) -> StoreResult<Vec<EmployeeId>> {
        let ids: Vec<i32> = employees::Entity::find()
            .select_only()
            .column(employees::Column::Id)
            .order_by_asc(employees::Column::Id)
            .into_tuple()
            .all(self.conn)
            .await
            .map_err(backend)?;

        Ok(ids.into_iter().map(EmployeeId::new).collect())
    }

    async fn find_employee(&self, id: EmployeeId) -> StoreResult<Option<EmployeeSnapshot>> {
        let found = employees::Entity::find_by_id(id.into_inner())
            .one(self.conn)
            .await
            .map_err(backend)?;

        Ok(found.map(EmployeeSnapshot::from))
    }

    async fn report_lines(
        &self,
        range: &DateRange,
        employees: Option<&BTreeSet<EmployeeId>>,
    ) -> StoreResult<Vec<ReportLine>> {
        let mut query = reports::Entity::find()
            .select_only()
            .column(reports::Column::Id)
            .column(reports::Column::Date)
            .column(reports::Column::EmployeeId)
            .column(reports::Column::EmployeeName)
            .column(reports::Column::CompanyId)
            .column_as(companies::Column::Name, "company_name")
            .column(reports::Column::DepartmentId)
            .column_as(departments::Column::Name, "department_name")
            .column(reports::Column::PositionId)
            .column_as(positions::Column::Name, "position_name")
            .column(reports::Column::CommissionProjectId)
            .column_as(commission_projects::Column::FieldName, "project_name")
            .column(reports::Column::CommissionValue)
            .join(JoinType::LeftJoin, reports::Relation::Companies.def())
            .join(JoinType::LeftJoin, reports::Relation::Departments.def())
            .join(JoinType::LeftJoin, reports::Relation::Positions.def())
            .join(JoinType::LeftJoin, reports::Relation::CommissionProjects.def())
            .filter(reports::Column::Status.eq(RecordStatus::Active))
            .filter(reports::Column::Date.between(range.start_string(), range.end_string()));

        if let Some(ids) = employees {
            query = query.filter(id_filter(reports::Column::EmployeeId, ids));
        }

        let rows = query
            .order_by_asc(reports::Column::Id)
            .into_model::<ReportLineRow>()
            .all(self.conn)
            .await
            .map_err(backend)?;

        Ok(rows.into_iter().map(ReportLine::from).collect())
    }
}
