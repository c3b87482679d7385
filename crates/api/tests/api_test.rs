//! Router tests against an in-memory database.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use commission_api::{AppState, create_router};
use commission_db::migration::{Migrator, MigratorTrait};
use commission_db::{
    CommissionProjectRepository, CompanyRepository, DepartmentRepository, EmployeeRepository,
    PositionRepository, ProjectPermissionRepository, UserRepository,
    repositories::{
        CreateCommissionProjectInput, CreateCompanyInput, CreateDepartmentInput,
        CreateEmployeeInput, CreatePositionInput, CreateProjectPermissionInput, CreateUserInput,
    },
};
use commission_shared::types::{CompanyId, DepartmentId, PositionId, ProjectPermissionId};
use commission_shared::{JwtService, TokenConfig};
use http_body_util::BodyExt;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::{Value, json};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    /// Ids of the seeded employees, in creation order.
    employees: Vec<i32>,
    project: i32,
}

async fn seed(db: &DatabaseConnection) -> (Vec<i32>, i32) {
    let company = CompanyRepository::new(db.clone())
        .create(CreateCompanyInput {
            name: "Acme".into(),
            status: None,
        })
        .await
        .unwrap();
    let department = DepartmentRepository::new(db.clone())
        .create(CreateDepartmentInput {
            company_id: CompanyId::new(company.id),
            name: "Sales".into(),
            status: None,
        })
        .await
        .unwrap();
    let position = PositionRepository::new(db.clone())
        .create(CreatePositionInput {
            name: "Agent".into(),
            status: None,
        })
        .await
        .unwrap();
    let permission = ProjectPermissionRepository::new(db.clone())
        .create(CreateProjectPermissionInput {
            permission: "Retail".into(),
            status: None,
        })
        .await
        .unwrap();
    let project = CommissionProjectRepository::new(db.clone())
        .create(CreateCommissionProjectInput {
            field_name: "Alpha".into(),
            project_perm_id: ProjectPermissionId::new(permission.id),
            status: None,
        })
        .await
        .unwrap();

    let employee_repo = EmployeeRepository::new(db.clone());
    let mut employees = Vec::new();
    for name in ["Ann", "Bea", "Cid"] {
        let employee = employee_repo
            .create(CreateEmployeeInput {
                company_id: CompanyId::new(company.id),
                department_id: DepartmentId::new(department.id),
                position_id: PositionId::new(position.id),
                project_perm_ids: permission.id.to_string(),
                name: name.into(),
                status: None,
            })
            .await
            .unwrap();
        employees.push(employee.id);
    }

    let users = UserRepository::new(db.clone());
    for (username, is_admin, scope) in [
        ("admin", true, "0".to_string()),
        ("user1", false, format!("{},x", employees[0])),
        ("nobody", false, String::new()),
    ] {
        users
            .create(CreateUserInput {
                username: username.into(),
                name: username.into(),
                is_admin,
                employee_scope: scope,
                status: None,
            })
            .await
            .unwrap();
    }

    (employees, project.id)
}

async fn setup() -> TestApp {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    let (employees, project) = seed(&db).await;

    let jwt = JwtService::new(TokenConfig {
        secret: "test-secret-key-for-router-tests".into(),
        access_token_expires_secs: 3600,
    });
    let router = create_router(AppState::new(db, jwt, "password"));

    TestApp {
        router,
        employees,
        project,
    }
}

impl TestApp {
    async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn login(&self, username: &str) -> String {
        let (status, body) = self
            .send(
                "POST",
                "/api/v1/login",
                None,
                Some(json!({ "username": username, "password": "password" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }
}

#[tokio::test]
async fn test_health_is_public() {
    let app = setup().await;
    let (status, body) = app.send("GET", "/api/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_login_rejects_wrong_password_and_unknown_user() {
    let app = setup().await;

    for (username, password) in [("user1", "nope"), ("ghost", "password")] {
        let (status, body) = app
            .send(
                "POST",
                "/api/v1/login",
                None,
                Some(json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "UNAUTHORIZED");
    }
}

#[tokio::test]
async fn test_malformed_json_is_a_validation_error() {
    let app = setup().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = setup().await;
    let (status, _) = app.send("GET", "/api/v1/profile", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send("GET", "/api/v1/profile", Some("garbage"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_roundtrip() {
    let app = setup().await;
    let token = app.login("user1").await;

    let (status, body) = app
        .send(
            "PUT",
            "/api/v1/profile",
            Some(&token),
            Some(json!({ "name": "User One" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "User One");

    let (_, body) = app.send("GET", "/api/v1/profile", Some(&token), None).await;
    assert_eq!(body["username"], "user1");
    assert_eq!(body["name"], "User One");
}

#[tokio::test]
async fn test_admin_routes_reject_regular_users() {
    let app = setup().await;
    let token = app.login("user1").await;

    let (status, body) = app
        .send("GET", "/api/v1/admin/companies", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");

    // The read-only list is open to them.
    let (status, body) = app
        .send("GET", "/api/v1/companies", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
}

#[tokio::test]
async fn test_admin_delete_guard_returns_conflict() {
    let app = setup().await;
    let token = app.login("admin").await;

    let (status, body) = app
        .send("DELETE", "/api/v1/admin/departments/1", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "CONFLICT");

    let (status, body) = app
        .send(
            "POST",
            "/api/v1/admin/departments",
            Some(&token),
            Some(json!({ "company_id": 99, "name": "Lost" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_REFERENCE");
}

#[tokio::test]
async fn test_admin_duplicate_username_is_conflict() {
    let app = setup().await;
    let token = app.login("admin").await;

    let (status, _) = app
        .send(
            "POST",
            "/api/v1/admin/users",
            Some(&token),
            Some(json!({ "username": "user1", "name": "Again" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_scoped_user_sees_only_their_employees() {
    let app = setup().await;
    let token = app.login("user1").await;

    let (status, body) = app
        .send("GET", "/api/v1/employees", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["id"], app.employees[0]);

    let empty = app.login("nobody").await;
    let (_, body) = app
        .send("GET", "/api/v1/employees", Some(&empty), None)
        .await;
    assert_eq!(body["meta"]["total"], 0);
}

#[tokio::test]
async fn test_report_submission_respects_scope() {
    let app = setup().await;
    let token = app.login("user1").await;

    let (status, body) = app
        .send(
            "POST",
            "/api/v1/reports",
            Some(&token),
            Some(json!({
                "date": "2024-01-15",
                "employee_id": app.employees[0],
                "commission_project_id": app.project,
                "commission_value": 100
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["employee_name"], "Ann");
    let own_report = body["id"].as_i64().unwrap();

    let (status, _) = app
        .send(
            "POST",
            "/api/v1/reports",
            Some(&token),
            Some(json!({
                "date": "2024-01-15",
                "employee_id": app.employees[1],
                "commission_project_id": app.project,
                "commission_value": 100
            })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .send(
            "POST",
            "/api/v1/reports/batch",
            Some(&token),
            Some(json!([
                {
                    "date": "2024-01-16",
                    "employee_id": app.employees[0],
                    "commission_project_id": app.project,
                    "commission_value": "50"
                },
                {
                    "date": "2024-01-17",
                    "employee_id": app.employees[0],
                    "commission_project_id": app.project,
                    "commission_value": 25
                }
            ])),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["count"], 2);

    let (status, body) = app
        .send("POST", "/api/v1/reports/batch", Some(&token), Some(json!([])))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, _) = app
        .send(
            "GET",
            &format!("/api/v1/my-reports/{own_report}"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_report_value_outside_column_precision_is_rejected() {
    let app = setup().await;
    let admin = app.login("admin").await;

    for value in [json!("0.005"), json!("12345678901234.5")] {
        let (status, body) = app
            .send(
                "POST",
                "/api/v1/reports",
                Some(&admin),
                Some(json!({
                    "date": "2024-01-15",
                    "employee_id": app.employees[0],
                    "commission_project_id": app.project,
                    "commission_value": value
                })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }

    let (status, body) = app
        .send("GET", "/api/v1/admin/reports", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 0);
}

#[tokio::test]
async fn test_monthly_summary_endpoints() {
    let app = setup().await;
    let admin = app.login("admin").await;

    for (employee, value) in [(app.employees[0], 100), (app.employees[1], 150)] {
        let (status, _) = app
            .send(
                "POST",
                "/api/v1/reports",
                Some(&admin),
                Some(json!({
                    "date": "2024-01-15",
                    "employee_id": employee,
                    "commission_project_id": app.project,
                    "commission_value": value
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = app
        .send(
            "GET",
            "/api/v1/admin/reports/monthly-summary?month=2024-01",
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["month"], "2024-01");
    assert_eq!(body["start_date"], "2024-01-01");
    assert_eq!(body["end_date"], "2024-01-31");
    assert_eq!(body["summaries"].as_array().unwrap().len(), 2);

    let user = app.login("user1").await;
    let (status, body) = app
        .send(
            "GET",
            "/api/v1/my-reports/monthly-summary?month=2024-01",
            Some(&user),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["summaries"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["employee_id"], app.employees[0]);
    assert_eq!(rows[0]["company_name"], "Acme");

    let (status, body) = app
        .send(
            "GET",
            "/api/v1/my-reports/monthly-summary",
            Some(&user),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation error: month required");

    let (status, body) = app
        .send(
            "GET",
            "/api/v1/my-reports/monthly-summary?month=2024-1",
            Some(&user),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation error: invalid date format");
}
