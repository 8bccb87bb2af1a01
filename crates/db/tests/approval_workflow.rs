//! Integration tests for the approval document lifecycle: creation with
//! line expansion, sequential approve/reject processing, and the queries
//! behind the pending/my-documents views.

mod common;

use common::{seed_employee, seed_org, set_department_manager};
use serde_json::json;
use smarthr_core::approval::{
    ACTION_APPROVE, ACTION_REJECT, DOC_STATUS_APPROVED, DOC_STATUS_IN_PROGRESS,
    DOC_STATUS_PENDING, DOC_STATUS_REJECTED, LINE_STATUS_APPROVED, LINE_STATUS_PENDING,
    LINE_STATUS_REJECTED,
};
use smarthr_core::error::CoreError;
use smarthr_db::models::approval::CreateDocument;
use smarthr_db::models::employee::Employee;
use smarthr_db::repositories::{DocumentRepo, FormRepo};
use smarthr_db::DbError;
use sqlx::PgPool;

/// Everything a workflow test needs: a requester, their department manager,
/// and an HR member whose department also has a manager (for `HR_MANAGER`).
struct WorkflowFixture {
    requester: Employee,
    manager: Employee,
    hr_member: Employee,
    hr_manager: Employee,
}

async fn seed_workflow(pool: &PgPool) -> WorkflowFixture {
    let org = seed_org(pool).await;
    let manager = seed_employee(pool, &org, "MGR-001", "manager").await;
    let requester = seed_employee(pool, &org, "EMP-100", "employee").await;
    set_department_manager(pool, org.department_id, manager.id).await;

    let hr_org = common::seed_org_named(pool, "ACME-HR", "ACME Korea HR", "People Team").await;
    let hr_manager = seed_employee(pool, &hr_org, "HRM-001", "manager").await;
    let hr_member = seed_employee(pool, &hr_org, "HR-100", "hr").await;
    set_department_manager(pool, hr_org.department_id, hr_manager.id).await;

    WorkflowFixture {
        requester,
        manager,
        hr_member,
        hr_manager,
    }
}

async fn form_id(pool: &PgPool, code: &str) -> i64 {
    FormRepo::find_by_code(pool, code)
        .await
        .unwrap()
        .unwrap_or_else(|| panic!("form '{code}' should be seeded"))
        .id
}

fn vacation_content() -> serde_json::Value {
    json!({
        "start_date": "2026-08-10",
        "end_date": "2026-08-12",
        "vacation_type": "ANNUAL",
        "reason": "Summer break"
    })
}

async fn create_vacation_document(
    pool: &PgPool,
    requester_id: i64,
) -> smarthr_db::models::approval::ApprovalDocument {
    let create = CreateDocument {
        form_id: form_id(pool, "VACATION").await,
        title: "Annual leave".to_string(),
        content: vacation_content(),
        requester_id,
    };
    DocumentRepo::create(pool, &create).await.unwrap()
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_document_expands_lines_and_logs_draft(pool: PgPool) {
    let fx = seed_workflow(&pool).await;

    let document = create_vacation_document(&pool, fx.requester.id).await;

    assert_eq!(document.status, DOC_STATUS_PENDING);
    assert_eq!(document.current_level, 0);
    assert_eq!(document.total_level, 2);
    assert!(document.document_number.starts_with("VACATION-"));

    let detail = DocumentRepo::get_detail(&pool, document.id)
        .await
        .unwrap()
        .unwrap();

    // One line per template level, all pending, in order.
    assert_eq!(detail.lines.len(), 2);
    assert_eq!(detail.lines[0].level, 1);
    assert_eq!(detail.lines[0].approver_id, fx.manager.id);
    assert_eq!(detail.lines[0].status, LINE_STATUS_PENDING);
    assert_eq!(detail.lines[1].level, 2);
    assert_eq!(detail.lines[1].approver_id, fx.hr_member.id);

    // Exactly one DRAFT history row.
    assert_eq!(detail.history.len(), 1);
    assert_eq!(detail.history[0].action_type, "DRAFT");
    assert_eq!(detail.history[0].actor_id, fx.requester.id);
    assert_eq!(detail.history[0].resulting_status, DOC_STATUS_PENDING);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_document_numbers_increment_within_scope(pool: PgPool) {
    let fx = seed_workflow(&pool).await;

    let first = create_vacation_document(&pool, fx.requester.id).await;
    let second = create_vacation_document(&pool, fx.requester.id).await;

    assert!(first.document_number.ends_with("-0001"));
    assert!(second.document_number.ends_with("-0002"));
    // Same form + month share the prefix.
    assert_eq!(
        &first.document_number[..first.document_number.len() - 4],
        &second.document_number[..second.document_number.len() - 4]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_required_field_rolls_back(pool: PgPool) {
    let fx = seed_workflow(&pool).await;

    let create = CreateDocument {
        form_id: form_id(&pool, "VACATION").await,
        title: "Broken request".to_string(),
        content: json!({ "start_date": "2026-08-10" }), // end_date missing
        requester_id: fx.requester.id,
    };
    let result = DocumentRepo::create(&pool, &create).await;
    assert!(matches!(
        result,
        Err(DbError::Domain(CoreError::Validation(_)))
    ));

    // Nothing was written.
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM approval_documents")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count.0, 0, "no document rows may survive a failed create");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unresolvable_approver_rolls_back(pool: PgPool) {
    let org = seed_org(&pool).await;
    // No department manager assigned, so DEPT_MANAGER cannot resolve.
    let requester = seed_employee(&pool, &org, "EMP-101", "employee").await;

    let create = CreateDocument {
        form_id: form_id(&pool, "VACATION").await,
        title: "Annual leave".to_string(),
        content: vacation_content(),
        requester_id: requester.id,
    };
    let result = DocumentRepo::create(&pool, &create).await;
    assert!(matches!(
        result,
        Err(DbError::Domain(CoreError::Validation(_)))
    ));

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM approval_documents")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count.0, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_inactive_form_rejected(pool: PgPool) {
    let fx = seed_workflow(&pool).await;
    let id = form_id(&pool, "VACATION").await;
    sqlx::query("UPDATE approval_forms SET is_active = false WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .unwrap();

    let create = CreateDocument {
        form_id: id,
        title: "Annual leave".to_string(),
        content: vacation_content(),
        requester_id: fx.requester.id,
    };
    let result = DocumentRepo::create(&pool, &create).await;
    assert!(matches!(
        result,
        Err(DbError::Domain(CoreError::InvalidState(_)))
    ));
}

// ---------------------------------------------------------------------------
// Processing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_approve_advances_level_then_completes(pool: PgPool) {
    let fx = seed_workflow(&pool).await;
    let document = create_vacation_document(&pool, fx.requester.id).await;

    // Level 1: department manager approves.
    let after_first = DocumentRepo::process(
        &pool,
        document.id,
        fx.manager.id,
        ACTION_APPROVE,
        Some("Looks fine"),
    )
    .await
    .unwrap();
    assert_eq!(after_first.status, DOC_STATUS_IN_PROGRESS);
    assert_eq!(after_first.current_level, 1);
    assert!(after_first.processed_at.is_none());

    // Level 2: HR member approves; document is terminal.
    let after_second = DocumentRepo::process(
        &pool,
        document.id,
        fx.hr_member.id,
        ACTION_APPROVE,
        None,
    )
    .await
    .unwrap();
    assert_eq!(after_second.status, DOC_STATUS_APPROVED);
    assert_eq!(after_second.current_level, after_second.total_level);
    assert!(after_second.processed_at.is_some());

    let detail = DocumentRepo::get_detail(&pool, document.id)
        .await
        .unwrap()
        .unwrap();
    assert!(detail
        .lines
        .iter()
        .all(|l| l.status == LINE_STATUS_APPROVED));
    // DRAFT + two APPROVEs.
    assert_eq!(detail.history.len(), 3);
    assert_eq!(detail.history[1].action_type, ACTION_APPROVE);
    assert_eq!(detail.history[1].comment.as_deref(), Some("Looks fine"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_out_of_order_approver_is_rejected(pool: PgPool) {
    let fx = seed_workflow(&pool).await;
    let document = create_vacation_document(&pool, fx.requester.id).await;

    // The level-2 approver cannot act while level 1 is unresolved.
    let result =
        DocumentRepo::process(&pool, document.id, fx.hr_member.id, ACTION_APPROVE, None).await;
    assert!(matches!(
        result,
        Err(DbError::Domain(CoreError::Forbidden(_)))
    ));

    // Document unchanged.
    let unchanged = DocumentRepo::find_by_id(&pool, document.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.status, DOC_STATUS_PENDING);
    assert_eq!(unchanged.current_level, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unrelated_employee_has_no_authority(pool: PgPool) {
    let fx = seed_workflow(&pool).await;
    let document = create_vacation_document(&pool, fx.requester.id).await;

    let result =
        DocumentRepo::process(&pool, document.id, fx.hr_manager.id, ACTION_APPROVE, None).await;
    assert!(matches!(
        result,
        Err(DbError::Domain(CoreError::Forbidden(_)))
    ));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reject_is_terminal(pool: PgPool) {
    let fx = seed_workflow(&pool).await;
    let document = create_vacation_document(&pool, fx.requester.id).await;

    let rejected = DocumentRepo::process(
        &pool,
        document.id,
        fx.manager.id,
        ACTION_REJECT,
        Some("Coverage gap"),
    )
    .await
    .unwrap();
    assert_eq!(rejected.status, DOC_STATUS_REJECTED);
    assert!(rejected.processed_at.is_some());
    // Rejection does not advance the level.
    assert_eq!(rejected.current_level, 0);

    let detail = DocumentRepo::get_detail(&pool, document.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(detail.lines[0].status, LINE_STATUS_REJECTED);
    assert_eq!(detail.lines[1].status, LINE_STATUS_PENDING);

    // No further action succeeds, not even from the level-2 approver.
    let result =
        DocumentRepo::process(&pool, document.id, fx.hr_member.id, ACTION_APPROVE, None).await;
    assert!(matches!(
        result,
        Err(DbError::Domain(CoreError::InvalidState(_)))
    ));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_terminal_document_rejects_reprocessing(pool: PgPool) {
    let fx = seed_workflow(&pool).await;
    let document = create_vacation_document(&pool, fx.requester.id).await;

    DocumentRepo::process(&pool, document.id, fx.manager.id, ACTION_APPROVE, None)
        .await
        .unwrap();
    DocumentRepo::process(&pool, document.id, fx.hr_member.id, ACTION_APPROVE, None)
        .await
        .unwrap();

    // Approved document is immutable.
    let result =
        DocumentRepo::process(&pool, document.id, fx.hr_member.id, ACTION_APPROVE, None).await;
    assert!(matches!(
        result,
        Err(DbError::Domain(CoreError::InvalidState(_)))
    ));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_action_rejected(pool: PgPool) {
    let fx = seed_workflow(&pool).await;
    let document = create_vacation_document(&pool, fx.requester.id).await;

    let result = DocumentRepo::process(&pool, document.id, fx.manager.id, "FLAG", None).await;
    assert!(matches!(
        result,
        Err(DbError::Domain(CoreError::Validation(_)))
    ));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_single_level_form_completes_in_one_step(pool: PgPool) {
    let fx = seed_workflow(&pool).await;

    let create = CreateDocument {
        form_id: form_id(&pool, "OVERTIME").await,
        title: "Release overtime".to_string(),
        content: json!({ "work_date": "2026-08-01", "hours": 3, "reason": "deploy" }),
        requester_id: fx.requester.id,
    };
    let document = DocumentRepo::create(&pool, &create).await.unwrap();
    assert_eq!(document.total_level, 1);

    let approved =
        DocumentRepo::process(&pool, document.id, fx.manager.id, ACTION_APPROVE, None)
            .await
            .unwrap();
    assert_eq!(approved.status, DOC_STATUS_APPROVED);
    assert_eq!(approved.current_level, 1);
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_pending_list_follows_current_level(pool: PgPool) {
    let fx = seed_workflow(&pool).await;
    let document = create_vacation_document(&pool, fx.requester.id).await;

    // Before any action the manager sees it, HR does not.
    let manager_pending = DocumentRepo::list_pending_for(&pool, fx.manager.id)
        .await
        .unwrap();
    assert_eq!(manager_pending.len(), 1);
    assert_eq!(manager_pending[0].id, document.id);
    assert!(DocumentRepo::list_pending_for(&pool, fx.hr_member.id)
        .await
        .unwrap()
        .is_empty());

    DocumentRepo::process(&pool, document.id, fx.manager.id, ACTION_APPROVE, None)
        .await
        .unwrap();

    // After level 1 resolves, the queue moves to HR.
    assert!(DocumentRepo::list_pending_for(&pool, fx.manager.id)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(
        DocumentRepo::list_pending_for(&pool, fx.hr_member.id)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_my_documents_with_status_filter(pool: PgPool) {
    let fx = seed_workflow(&pool).await;
    let first = create_vacation_document(&pool, fx.requester.id).await;
    let second = create_vacation_document(&pool, fx.requester.id).await;

    DocumentRepo::process(&pool, first.id, fx.manager.id, ACTION_REJECT, None)
        .await
        .unwrap();

    let all = DocumentRepo::list_for_requester(&pool, fx.requester.id, None)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    // Newest first.
    assert_eq!(all[0].id, second.id);

    let rejected =
        DocumentRepo::list_for_requester(&pool, fx.requester.id, Some(DOC_STATUS_REJECTED))
            .await
            .unwrap();
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].id, first.id);
}
