//! Shared fixtures for repository integration tests.
//!
//! Every test gets its own in-memory SQLite database migrated with the real
//! migration. The pool holds a single connection so the memory database
//! lives as long as the handle.

#![allow(dead_code)]

use commission_db::migration::{Migrator, MigratorTrait};
use commission_db::{
    CommissionProjectRepository, CompanyRepository, DepartmentRepository, EmployeeRepository,
    PositionRepository, ProjectPermissionRepository,
    repositories::{
        CreateCommissionProjectInput, CreateCompanyInput, CreateDepartmentInput,
        CreateEmployeeInput, CreatePositionInput, CreateProjectPermissionInput,
    },
};
use commission_shared::types::{
    CommissionProjectId, CompanyId, DepartmentId, EmployeeId, PositionId, ProjectPermissionId,
};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// Opens a fresh migrated database.
pub async fn setup() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None).await.expect("Failed to migrate");
    db
}

/// Ids of the rows created by [`seed_org`].
#[derive(Debug, Clone, Copy)]
pub struct Org {
    pub company: CompanyId,
    pub department: DepartmentId,
    pub position: PositionId,
    pub permission: ProjectPermissionId,
    pub project: CommissionProjectId,
}

/// Creates one company, department, position, permission and project.
pub async fn seed_org(db: &DatabaseConnection) -> Org {
    let company = CompanyRepository::new(db.clone())
        .create(CreateCompanyInput {
            name: "Acme".to_string(),
            status: None,
        })
        .await
        .expect("Failed to create company");

    let department = DepartmentRepository::new(db.clone())
        .create(CreateDepartmentInput {
            company_id: CompanyId::new(company.id),
            name: "Sales".to_string(),
            status: None,
        })
        .await
        .expect("Failed to create department");

    let position = PositionRepository::new(db.clone())
        .create(CreatePositionInput {
            name: "Agent".to_string(),
            status: None,
        })
        .await
        .expect("Failed to create position");

    let permission = ProjectPermissionRepository::new(db.clone())
        .create(CreateProjectPermissionInput {
            permission: "Retail".to_string(),
            status: None,
        })
        .await
        .expect("Failed to create permission");

    let project = CommissionProjectRepository::new(db.clone())
        .create(CreateCommissionProjectInput {
            field_name: "Alpha".to_string(),
            project_perm_id: ProjectPermissionId::new(permission.id),
            status: None,
        })
        .await
        .expect("Failed to create project");

    Org {
        company: CompanyId::new(company.id),
        department: DepartmentId::new(department.id),
        position: PositionId::new(position.id),
        permission: ProjectPermissionId::new(permission.id),
        project: CommissionProjectId::new(project.id),
    }
}

/// Creates an employee inside `org`.
pub async fn add_employee(db: &DatabaseConnection, org: &Org, name: &str) -> EmployeeId {
    let employee = EmployeeRepository::new(db.clone())
        .create(CreateEmployeeInput {
            company_id: org.company,
            department_id: org.department,
            position_id: org.position,
            project_perm_ids: org.permission.to_string(),
            name: name.to_string(),
            status: None,
        })
        .await
        .expect("Failed to create employee");
    EmployeeId::new(employee.id)
}

/// Creates an extra commission project under `org`'s permission.
pub async fn add_project(db: &DatabaseConnection, org: &Org, name: &str) -> CommissionProjectId {
    let project = CommissionProjectRepository::new(db.clone())
        .create(CreateCommissionProjectInput {
            field_name: name.to_string(),
            project_perm_id: org.permission,
            status: None,
        })
        .await
        .expect("Failed to create project");
    CommissionProjectId::new(project.id)
}
