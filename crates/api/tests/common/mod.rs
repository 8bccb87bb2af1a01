//! Shared helpers for HTTP-level integration tests.
//!
//! Builds the full application router with the same middleware stack as
//! `main.rs` and provides request/seeding helpers.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use smarthr_core::lockout::LockoutPolicy;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use smarthr_api::auth::jwt::JwtConfig;
use smarthr_api::auth::password::hash_password;
use smarthr_api::config::ServerConfig;
use smarthr_api::routes;
use smarthr_api::state::AppState;
use smarthr_db::models::employee::{CreateEmployee, Employee};
use smarthr_db::models::organization::{
    CreateCompany, CreateDepartment, CreatePosition, CreateSubCompany, UpdateDepartment,
};
use smarthr_db::repositories::{
    CompanyRepo, DepartmentRepo, EmployeeRepo, PositionRepo, RoleRepo, SubCompanyRepo,
};

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough".to_string(),
            access_token_expiry_hours: 24,
            refresh_token_expiry_days: 7,
        },
        lockout: LockoutPolicy::default(),
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();

    let state = AppState {
        pool,
        config: Arc::new(config),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a GET request with a Bearer token.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body and a Bearer token.
pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a PUT request with a JSON body and a Bearer token.
pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a DELETE request with a Bearer token.
pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Seeding helpers
// ---------------------------------------------------------------------------

/// IDs of the seeded organizational tree.
pub struct TestOrg {
    pub company_id: i64,
    pub sub_company_id: i64,
    pub department_id: i64,
    pub position_id: i64,
}

/// Create one company -> sub-company -> department -> position chain.
pub async fn seed_org(pool: &PgPool) -> TestOrg {
    let company = CompanyRepo::create(
        pool,
        &CreateCompany {
            code: "ACME".to_string(),
            name: "ACME Korea".to_string(),
        },
    )
    .await
    .unwrap();
    let sub_company = SubCompanyRepo::create(
        pool,
        &CreateSubCompany {
            company_id: company.id,
            name: "ACME HQ".to_string(),
        },
    )
    .await
    .unwrap();
    let department = DepartmentRepo::create(
        pool,
        &CreateDepartment {
            sub_company_id: sub_company.id,
            name: "Engineering".to_string(),
        },
    )
    .await
    .unwrap();
    let position = PositionRepo::create(
        pool,
        &CreatePosition {
            department_id: department.id,
            name: "Staff".to_string(),
            grade_level: Some(1),
        },
    )
    .await
    .unwrap();

    TestOrg {
        company_id: company.id,
        sub_company_id: sub_company.id,
        department_id: department.id,
        position_id: position.id,
    }
}

/// Default plaintext password for seeded test employees.
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Create a test employee directly in the database with a real password
/// hash so the login endpoint works against it.
pub async fn create_test_employee(
    pool: &PgPool,
    org: &TestOrg,
    code: &str,
    role: &str,
) -> Employee {
    let role_id = RoleRepo::find_by_name(pool, role)
        .await
        .unwrap()
        .unwrap_or_else(|| panic!("role '{role}' should be seeded"))
        .id;
    let hashed = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    let input = CreateEmployee {
        employee_code: code.to_string(),
        email: format!("{}@test.example", code.to_lowercase()),
        password_hash: hashed,
        first_name: code.to_string(),
        last_name: "Test".to_string(),
        role_id,
        company_id: org.company_id,
        sub_company_id: org.sub_company_id,
        department_id: org.department_id,
        position_id: org.position_id,
        hire_date: None,
    };
    EmployeeRepo::create(pool, &input)
        .await
        .expect("employee creation should succeed")
}

/// Make an employee the manager of a department.
pub async fn set_department_manager(pool: &PgPool, department_id: i64, manager_id: i64) {
    DepartmentRepo::update(
        pool,
        department_id,
        &UpdateDepartment {
            name: None,
            manager_id: Some(manager_id),
        },
    )
    .await
    .unwrap()
    .expect("department should exist");
}

/// Log in via the API and return the access token.
pub async fn login_token(app: Router, email: &str) -> String {
    let body = serde_json::json!({ "email": email, "password": TEST_PASSWORD });
    let response = post_json(app, "/api/auth/login", body).await;
    assert_eq!(
        response.status(),
        StatusCode::OK,
        "login for {email} should succeed"
    );
    let json = body_json(response).await;
    json["access_token"].as_str().unwrap().to_string()
}
