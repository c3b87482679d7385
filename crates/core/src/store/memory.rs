//! In-memory `EntityStore` used by the unit tests of this crate.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use commission_shared::types::{
    CommissionProjectId, CompanyId, DepartmentId, EmployeeId, PositionId, ReportId, UserId,
};
use rust_decimal::Decimal;

use super::{EmployeeSnapshot, EntityKind, EntityStore, ForeignKey, StoreError, StoreResult};
use crate::report::ReportPlan;
use crate::scope::Scope;
use crate::summary::{DateRange, ReportLine};

#[derive(Debug, Clone)]
pub struct StoredReport {
    pub id: ReportId,
    pub plan: ReportPlan,
    pub active: bool,
}

#[derive(Debug, Default)]
struct Tables {
    companies: BTreeMap<i32, String>,
    departments: BTreeMap<i32, (i32, String)>,
    positions: BTreeMap<i32, String>,
    permissions: BTreeMap<i32, String>,
    projects: BTreeMap<i32, (i32, String)>,
    employees: BTreeMap<i32, EmployeeSnapshot>,
    reports: BTreeMap<i32, StoredReport>,
    users: BTreeMap<i32, Scope>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    fail_employee_listing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_company(&self, id: i32, name: &str) {
        self.tables.write().unwrap().companies.insert(id, name.to_string());
    }

    pub fn add_department(&self, id: i32, company_id: i32, name: &str) {
        self.tables
            .write()
            .unwrap()
            .departments
            .insert(id, (company_id, name.to_string()));
    }

    pub fn add_position(&self, id: i32, name: &str) {
        self.tables.write().unwrap().positions.insert(id, name.to_string());
    }

    pub fn add_permission(&self, id: i32, name: &str) {
        self.tables.write().unwrap().permissions.insert(id, name.to_string());
    }

    pub fn add_project(&self, id: i32, perm_id: i32, field_name: &str) {
        self.tables
            .write()
            .unwrap()
            .projects
            .insert(id, (perm_id, field_name.to_string()));
    }

    pub fn add_employee(&self, id: i32, name: &str, company: i32, department: i32, position: i32) {
        self.tables.write().unwrap().employees.insert(
            id,
            EmployeeSnapshot {
                id: EmployeeId::new(id),
                name: name.to_string(),
                company_id: CompanyId::new(company),
                department_id: DepartmentId::new(department),
                position_id: PositionId::new(position),
            },
        );
    }

    pub fn find(&self, id: i32) -> EmployeeSnapshot {
        self.tables.read().unwrap().employees[&id].clone()
    }

    pub fn rename_employee(&self, id: i32, name: &str) {
        if let Some(employee) = self.tables.write().unwrap().employees.get_mut(&id) {
            employee.name = name.to_string();
        }
    }

    pub fn remove_department(&self, id: i32) {
        self.tables.write().unwrap().departments.remove(&id);
    }

    pub fn add_user(&self, id: i32, scope: &str) {
        self.tables
            .write()
            .unwrap()
            .users
            .insert(id, Scope::parse(scope));
    }

    pub fn insert_report(&self, id: i32, plan: ReportPlan) {
        self.tables.write().unwrap().reports.insert(
            id,
            StoredReport {
                id: ReportId::new(id),
                plan,
                active: true,
            },
        );
    }

    pub fn deactivate_report(&self, id: i32) {
        if let Some(report) = self.tables.write().unwrap().reports.get_mut(&id) {
            report.active = false;
        }
    }

    pub fn report(&self, id: i32) -> Option<StoredReport> {
        self.tables.read().unwrap().reports.get(&id).cloned()
    }

    pub fn fail_employee_listing(&self) {
        self.fail_employee_listing.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn exists(&self, kind: EntityKind, id: i32) -> StoreResult<bool> {
        let t = self.tables.read().unwrap();
        Ok(match kind {
            EntityKind::Company => t.companies.contains_key(&id),
            EntityKind::Department => t.departments.contains_key(&id),
            EntityKind::Position => t.positions.contains_key(&id),
            EntityKind::ProjectPermission => t.permissions.contains_key(&id),
            EntityKind::CommissionProject => t.projects.contains_key(&id),
            EntityKind::Employee => t.employees.contains_key(&id),
            EntityKind::Report => t.reports.contains_key(&id),
            EntityKind::User => t.users.contains_key(&id),
        })
    }

    async fn count_references(&self, fk: ForeignKey, id: i32) -> StoreResult<u64> {
        let t = self.tables.read().unwrap();
        let count = match fk {
            ForeignKey::DepartmentCompany => {
                t.departments.values().filter(|(c, _)| *c == id).count()
            }
            ForeignKey::EmployeeCompany => t
                .employees
                .values()
                .filter(|e| e.company_id.into_inner() == id)
                .count(),
            ForeignKey::EmployeeDepartment => t
                .employees
                .values()
                .filter(|e| e.department_id.into_inner() == id)
                .count(),
            ForeignKey::EmployeePosition => t
                .employees
                .values()
                .filter(|e| e.position_id.into_inner() == id)
                .count(),
            ForeignKey::CommissionProjectPermission => {
                t.projects.values().filter(|(p, _)| *p == id).count()
            }
            ForeignKey::ReportEmployee => t
                .reports
                .values()
                .filter(|r| r.plan.employee_id.into_inner() == id)
                .count(),
            ForeignKey::ReportCommissionProject => t
                .reports
                .values()
                .filter(|r| r.plan.commission_project_id.into_inner() == id)
                .count(),
        };
        Ok(count as u64)
    }

    async fn employee_scope(&self, user: UserId) -> StoreResult<Option<Scope>> {
        Ok(self
            .tables
            .read()
            .unwrap()
            .users
            .get(&user.into_inner())
            .cloned())
    }

    async fn employee_ids(&self) -> StoreResult<Vec<EmployeeId>> {
        if self.fail_employee_listing.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("employee listing unavailable".into()));
        }
        Ok(self
            .tables
            .read()
            .unwrap()
            .employees
            .keys()
            .copied()
            .map(EmployeeId::new)
            .collect())
    }

    async fn find_employee(&self, id: EmployeeId) -> StoreResult<Option<EmployeeSnapshot>> {
        Ok(self
            .tables
            .read()
            .unwrap()
            .employees
            .get(&id.into_inner())
            .cloned())
    }

    async fn report_lines(
        &self,
        range: &DateRange,
        employees: Option<&BTreeSet<EmployeeId>>,
    ) -> StoreResult<Vec<ReportLine>> {
        let t = self.tables.read().unwrap();
        let start = range.start_string();
        let end = range.end_string();

        Ok(t.reports
            .values()
            .filter(|r| r.active)
            .filter(|r| r.plan.date >= start && r.plan.date <= end)
            .filter(|r| employees.is_none_or(|set| set.contains(&r.plan.employee_id)))
            .map(|r| {
                let p = &r.plan;
                ReportLine {
                    report_id: r.id,
                    date: p.date.clone(),
                    employee_id: p.employee_id,
                    employee_name: p.employee_name.clone(),
                    company_id: p.company_id,
                    company_name: t.companies.get(&p.company_id.into_inner()).cloned(),
                    department_id: p.department_id,
                    department_name: t
                        .departments
                        .get(&p.department_id.into_inner())
                        .map(|(_, name)| name.clone()),
                    position_id: p.position_id,
                    position_name: t.positions.get(&p.position_id.into_inner()).cloned(),
                    commission_project_id: p.commission_project_id,
                    project_name: t
                        .projects
                        .get(&p.commission_project_id.into_inner())
                        .map(|(_, name)| name.clone()),
                    commission_value: p.commission_value,
                }
            })
            .collect())
    }
}

/// Builds a plan directly, bypassing the planner, for fixtures.
pub fn plan(
    date: &str,
    employee: &EmployeeSnapshot,
    project: i32,
    value: Decimal,
) -> ReportPlan {
    ReportPlan {
        date: date.to_string(),
        employee_id: employee.id,
        employee_name: employee.name.clone(),
        company_id: employee.company_id,
        department_id: employee.department_id,
        position_id: employee.position_id,
        commission_project_id: CommissionProjectId::new(project),
        commission_value: value,
    }
}
