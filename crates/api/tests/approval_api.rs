//! HTTP-level integration tests for the approval workflow and vacation
//! endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_test_employee, get_auth, post_json_auth, seed_org, set_department_manager,
};
use smarthr_db::models::employee::Employee;
use sqlx::PgPool;

/// Requester + department manager + HR member, wired so the seeded
/// VACATION form (`DEPT_MANAGER,HR_TEAM`) can expand its line.
struct Actors {
    requester: Employee,
    manager: Employee,
    hr_member: Employee,
}

async fn seed_actors(pool: &PgPool) -> Actors {
    let org = seed_org(pool).await;
    let manager = create_test_employee(pool, &org, "MGR-001", "manager").await;
    let requester = create_test_employee(pool, &org, "EMP-001", "employee").await;
    let hr_member = create_test_employee(pool, &org, "HR-001", "hr").await;
    set_department_manager(pool, org.department_id, manager.id).await;
    Actors {
        requester,
        manager,
        hr_member,
    }
}

async fn create_vacation_request(pool: &PgPool, requester_email: &str) -> serde_json::Value {
    let token = common::login_token(common::build_test_app(pool.clone()), requester_email).await;
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/vacation/request",
        serde_json::json!({
            "start_date": "2026-08-10",
            "end_date": "2026-08-12",
            "vacation_type": "ANNUAL",
            "reason": "Summer break"
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

/// The form catalog lists the seeded forms.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_forms(pool: PgPool) {
    let actors = seed_actors(&pool).await;
    let token =
        common::login_token(common::build_test_app(pool.clone()), &actors.requester.email).await;

    let response = get_auth(common::build_test_app(pool), "/api/approval/forms", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let codes: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["form_code"].as_str().unwrap())
        .collect();
    assert!(codes.contains(&"VACATION"));
    assert!(codes.contains(&"OVERTIME"));
}

/// Creating a vacation request yields a PENDING document at level 0 with a
/// scoped document number.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_vacation_request_creates_pending_document(pool: PgPool) {
    let actors = seed_actors(&pool).await;

    let json = create_vacation_request(&pool, &actors.requester.email).await;
    let document = &json["data"];

    assert_eq!(document["status"], "PENDING");
    assert_eq!(document["current_level"], 0);
    assert_eq!(document["total_level"], 2);
    assert!(document["document_number"]
        .as_str()
        .unwrap()
        .starts_with("VACATION-"));
    assert_eq!(document["requester_id"], actors.requester.id);
}

/// A document with a missing required field is rejected with 400.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_document_missing_required_field(pool: PgPool) {
    let actors = seed_actors(&pool).await;
    let token =
        common::login_token(common::build_test_app(pool.clone()), &actors.requester.email).await;

    // VACATION form id is 1 in seed order; look it up to stay robust.
    let forms = body_json(
        get_auth(
            common::build_test_app(pool.clone()),
            "/api/approval/forms",
            &token,
        )
        .await,
    )
    .await;
    let vacation_id = forms["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["form_code"] == "VACATION")
        .unwrap()["id"]
        .clone();

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/approval/documents",
        serde_json::json!({
            "form_id": vacation_id,
            "title": "Broken request",
            "content": { "start_date": "2026-08-10" }
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Full approve path: manager then HR, with the pending queue moving
/// between them.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sequential_approval_to_completion(pool: PgPool) {
    let actors = seed_actors(&pool).await;
    let json = create_vacation_request(&pool, &actors.requester.email).await;
    let document_id = json["data"]["id"].as_i64().unwrap();

    // The manager sees it pending.
    let manager_token =
        common::login_token(common::build_test_app(pool.clone()), &actors.manager.email).await;
    let pending = body_json(
        get_auth(
            common::build_test_app(pool.clone()),
            "/api/approval/pending",
            &manager_token,
        )
        .await,
    )
    .await;
    assert_eq!(pending["data"].as_array().unwrap().len(), 1);

    // Level 1: manager approves.
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/approval/documents/{document_id}/process"),
        serde_json::json!({ "action": "APPROVE", "comment": "Enjoy" }),
        &manager_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "IN_PROGRESS");
    assert_eq!(json["data"]["current_level"], 1);

    // Level 2: HR approves; terminal.
    let hr_token =
        common::login_token(common::build_test_app(pool.clone()), &actors.hr_member.email).await;
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/approval/documents/{document_id}/process"),
        serde_json::json!({ "action": "APPROVE" }),
        &hr_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "APPROVED");
    assert_eq!(json["data"]["current_level"], 2);

    // Further processing is refused.
    let response = post_json_auth(
        common::build_test_app(pool),
        &format!("/api/approval/documents/{document_id}/process"),
        serde_json::json!({ "action": "REJECT" }),
        &hr_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// The level-2 approver cannot act before level 1 resolves.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_out_of_order_approval_forbidden(pool: PgPool) {
    let actors = seed_actors(&pool).await;
    let json = create_vacation_request(&pool, &actors.requester.email).await;
    let document_id = json["data"]["id"].as_i64().unwrap();

    let hr_token =
        common::login_token(common::build_test_app(pool.clone()), &actors.hr_member.email).await;
    let response = post_json_auth(
        common::build_test_app(pool),
        &format!("/api/approval/documents/{document_id}/process"),
        serde_json::json!({ "action": "APPROVE" }),
        &hr_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Rejection terminates the document.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rejection_is_terminal(pool: PgPool) {
    let actors = seed_actors(&pool).await;
    let json = create_vacation_request(&pool, &actors.requester.email).await;
    let document_id = json["data"]["id"].as_i64().unwrap();

    let manager_token =
        common::login_token(common::build_test_app(pool.clone()), &actors.manager.email).await;
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/approval/documents/{document_id}/process"),
        serde_json::json!({ "action": "REJECT", "comment": "Coverage gap" }),
        &manager_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "REJECTED");

    let hr_token =
        common::login_token(common::build_test_app(pool.clone()), &actors.hr_member.email).await;
    let response = post_json_auth(
        common::build_test_app(pool),
        &format!("/api/approval/documents/{document_id}/process"),
        serde_json::json!({ "action": "APPROVE" }),
        &hr_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// Document detail is visible to the requester and approvers, hidden from
/// unrelated employees.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_document_detail_access_control(pool: PgPool) {
    let actors = seed_actors(&pool).await;
    // A second branch whose members are unrelated to the document.
    let org = seed_org_second(&pool).await;
    let outsider = create_test_employee(&pool, &org, "OUT-001", "employee").await;

    let json = create_vacation_request(&pool, &actors.requester.email).await;
    let document_id = json["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/approval/documents/{document_id}");

    // Requester sees the full detail, including lines and history.
    let requester_token =
        common::login_token(common::build_test_app(pool.clone()), &actors.requester.email).await;
    let response = get_auth(common::build_test_app(pool.clone()), &uri, &requester_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let detail = body_json(response).await;
    assert_eq!(detail["data"]["lines"].as_array().unwrap().len(), 2);
    assert_eq!(detail["data"]["history"].as_array().unwrap().len(), 1);
    assert_eq!(detail["data"]["history"][0]["action_type"], "DRAFT");

    // Approver on the line sees it too.
    let manager_token =
        common::login_token(common::build_test_app(pool.clone()), &actors.manager.email).await;
    let response = get_auth(common::build_test_app(pool.clone()), &uri, &manager_token).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Unrelated employee does not.
    let outsider_token =
        common::login_token(common::build_test_app(pool.clone()), &outsider.email).await;
    let response = get_auth(common::build_test_app(pool), &uri, &outsider_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// my-documents and my-requests list the requester's documents.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_my_documents_and_my_requests(pool: PgPool) {
    let actors = seed_actors(&pool).await;
    create_vacation_request(&pool, &actors.requester.email).await;

    let token =
        common::login_token(common::build_test_app(pool.clone()), &actors.requester.email).await;

    let mine = body_json(
        get_auth(
            common::build_test_app(pool.clone()),
            "/api/approval/my-documents",
            &token,
        )
        .await,
    )
    .await;
    assert_eq!(mine["data"].as_array().unwrap().len(), 1);

    let requests = body_json(
        get_auth(
            common::build_test_app(pool.clone()),
            "/api/vacation/my-requests",
            &token,
        )
        .await,
    )
    .await;
    assert_eq!(requests["data"].as_array().unwrap().len(), 1);

    // Team status shows the colleague's vacation to the manager.
    let manager_token =
        common::login_token(common::build_test_app(pool.clone()), &actors.manager.email).await;
    let team = body_json(
        get_auth(
            common::build_test_app(pool),
            "/api/vacation/team-status",
            &manager_token,
        )
        .await,
    )
    .await;
    let entries = team["data"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["employee_id"], actors.requester.id);
    assert_eq!(entries[0]["start_date"], "2026-08-10");
    assert_eq!(entries[0]["vacation_type"], "ANNUAL");
}

/// Seed a second, disjoint organizational branch.
async fn seed_org_second(pool: &PgPool) -> common::TestOrg {
    use smarthr_db::models::organization::{
        CreateCompany, CreateDepartment, CreatePosition, CreateSubCompany,
    };
    use smarthr_db::repositories::{CompanyRepo, DepartmentRepo, PositionRepo, SubCompanyRepo};

    let company = CompanyRepo::create(
        pool,
        &CreateCompany {
            code: "OTHER".to_string(),
            name: "Other Corp".to_string(),
        },
    )
    .await
    .unwrap();
    let sub_company = SubCompanyRepo::create(
        pool,
        &CreateSubCompany {
            company_id: company.id,
            name: "Other HQ".to_string(),
        },
    )
    .await
    .unwrap();
    let department = DepartmentRepo::create(
        pool,
        &CreateDepartment {
            sub_company_id: sub_company.id,
            name: "Elsewhere".to_string(),
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

    common::TestOrg {
        company_id: company.id,
        sub_company_id: sub_company.id,
        department_id: department.id,
        position_id: position.id,
    }
}
