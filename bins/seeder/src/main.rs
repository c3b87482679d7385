//! Database seeder for commission tracker development and testing.
//!
//! Seeds users, the organisation tree, commission projects and a handful of
//! reports for local development.
//!
//! Usage: cargo run --bin seeder

use commission_core::report::ReportDraft;
use commission_core::scope::{Scope, Visibility};
use commission_db::{
    CommissionProjectRepository, CompanyRepository, DepartmentRepository, EmployeeRepository,
    PositionRepository, ProjectPermissionRepository, ReportRepository, RepositoryError,
    UserRepository,
    repositories::{
        CreateCommissionProjectInput, CreateCompanyInput, CreateDepartmentInput,
        CreateEmployeeInput, CreatePositionInput, CreateProjectPermissionInput, CreateUserInput,
    },
};
use commission_shared::types::{
    CommissionProjectId, CompanyId, DepartmentId, EmployeeId, PositionId, ProjectPermissionId,
};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

type SeedResult<T> = Result<T, RepositoryError>;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = commission_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    let users = UserRepository::new(db.clone());
    if users
        .find_active_by_username("admin")
        .await
        .expect("Failed to query users")
        .is_some()
    {
        println!("Admin user already exists, skipping seed.");
        return;
    }

    println!("Seeding organisation...");
    let org = seed_organisation(&db).await.expect("Failed to seed organisation");

    println!("Seeding employees...");
    let employees = seed_employees(&db, &org)
        .await
        .expect("Failed to seed employees");

    println!("Seeding users...");
    seed_users(&users, &employees)
        .await
        .expect("Failed to seed users");

    println!("Seeding reports...");
    let count = seed_reports(&db, &employees, &org.projects)
        .await
        .expect("Failed to seed reports");
    println!("  {count} reports created");

    println!("Seeding complete!");
}

struct Organisation {
    companies: Vec<CompanyId>,
    departments: Vec<DepartmentId>,
    positions: Vec<PositionId>,
    permissions: Vec<ProjectPermissionId>,
    projects: Vec<CommissionProjectId>,
}

async fn seed_organisation(db: &DatabaseConnection) -> SeedResult<Organisation> {
    let company_repo = CompanyRepository::new(db.clone());
    let mut companies = Vec::new();
    for name in ["Lakeside Camps", "Harbour Water Sports"] {
        let company = company_repo
            .create(CreateCompanyInput {
                name: name.to_string(),
                status: None,
            })
            .await?;
        companies.push(CompanyId::new(company.id));
    }

    let department_repo = DepartmentRepository::new(db.clone());
    let mut departments = Vec::new();
    for (company, name) in [
        (companies[0], "Camp Operations"),
        (companies[1], "Water Centre"),
        (companies[1], "Marketing"),
    ] {
        let department = department_repo
            .create(CreateDepartmentInput {
                company_id: company,
                name: name.to_string(),
                status: None,
            })
            .await?;
        departments.push(DepartmentId::new(department.id));
    }

    let position_repo = PositionRepository::new(db.clone());
    let mut positions = Vec::new();
    for name in ["Camp Host", "Paddleboard Coach"] {
        let position = position_repo
            .create(CreatePositionInput {
                name: name.to_string(),
                status: None,
            })
            .await?;
        positions.push(PositionId::new(position.id));
    }

    let permission_repo = ProjectPermissionRepository::new(db.clone());
    let mut permissions = Vec::new();
    for name in ["General", "Marketing", "Customer Relations", "Operations"] {
        let permission = permission_repo
            .create(CreateProjectPermissionInput {
                permission: name.to_string(),
                status: None,
            })
            .await?;
        permissions.push(ProjectPermissionId::new(permission.id));
    }

    let project_repo = CommissionProjectRepository::new(db.clone());
    let mut projects = Vec::new();
    for (permission, name) in [
        (permissions[0], "Member Sign-ups"),
        (permissions[0], "Stored Value Sales"),
        (permissions[0], "Positive Reviews"),
        (permissions[1], "Online Revenue"),
        (permissions[1], "Video Content"),
        (permissions[2], "Member Spend"),
        (permissions[3], "Course Coaching"),
        (permissions[3], "Team Building Events"),
    ] {
        let project = project_repo
            .create(CreateCommissionProjectInput {
                field_name: name.to_string(),
                project_perm_id: permission,
                status: None,
            })
            .await?;
        projects.push(CommissionProjectId::new(project.id));
    }

    Ok(Organisation {
        companies,
        departments,
        positions,
        permissions,
        projects,
    })
}

async fn seed_employees(db: &DatabaseConnection, org: &Organisation) -> SeedResult<Vec<EmployeeId>> {
    let repo = EmployeeRepository::new(db.clone());
    let perms = |idx: &[usize]| {
        idx.iter()
            .map(|&i| org.permissions[i].to_string())
            .collect::<Vec<_>>()
            .join(",")
    };

    let mut employees = Vec::new();
    for (company, department, position, perm_idx, name) in [
        (0, 0, 0, &[0, 1][..], "Jay Summers"),
        (0, 0, 0, &[0, 2][..], "Yan Shao"),
        (1, 1, 1, &[0, 3][..], "Ziyang Hu"),
        (1, 1, 1, &[0, 1, 2][..], "Xin Liao"),
        (1, 1, 1, &[0, 1, 2, 3][..], "Yubo Wang"),
    ] {
        let employee = repo
            .create(CreateEmployeeInput {
                company_id: org.companies[company],
                department_id: org.departments[department],
                position_id: org.positions[position],
                project_perm_ids: perms(perm_idx),
                name: name.to_string(),
                status: None,
            })
            .await?;
        employees.push(EmployeeId::new(employee.id));
    }
    Ok(employees)
}

async fn seed_users(users: &UserRepository, employees: &[EmployeeId]) -> SeedResult<()> {
    let scope_of = |ids: &[EmployeeId]| Scope::Explicit(ids.iter().copied().collect()).to_string();

    for (username, name, is_admin, scope) in [
        ("admin", "Administrator", true, Scope::All.to_string()),
        ("user1", "Regular User 1", false, scope_of(&employees[..2])),
        ("user2", "Regular User 2", false, scope_of(&employees[2..])),
    ] {
        users
            .create(CreateUserInput {
                username: username.to_string(),
                name: name.to_string(),
                is_admin,
                employee_scope: scope,
                status: None,
            })
            .await?;
        println!("  Created user {username}");
    }
    Ok(())
}

async fn seed_reports(
    db: &DatabaseConnection,
    employees: &[EmployeeId],
    projects: &[CommissionProjectId],
) -> SeedResult<usize> {
    let mut drafts = Vec::new();
    for (i, &employee) in employees.iter().enumerate() {
        for day in 1..=3_usize {
            drafts.push(ReportDraft {
                date: format!("2024-01-{:02}", 10 + day),
                employee_id: employee,
                commission_project_id: projects[(i + day) % projects.len()],
                commission_value: Decimal::from(25 * day + 5 * i),
            });
        }
    }

    ReportRepository::new(db.clone())
        .create_batch(&drafts, &Visibility::All)
        .await
}
