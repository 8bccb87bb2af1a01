//! Full bootstrap tests: connect, migrate, verify schema and seed data.

use smarthr_core::approval::parse_approval_line_template;
use smarthr_db::repositories::{FormRepo, RoleRepo};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    // Health check
    smarthr_db::health_check(&pool).await.unwrap();

    // Core tables exist and are queryable.
    let tables = [
        "roles",
        "companies",
        "sub_companies",
        "departments",
        "positions",
        "employees",
        "employee_sessions",
        "assignment_history",
        "approval_forms",
        "approval_documents",
        "approval_lines",
        "approval_history",
    ];

    for table in tables {
        let _count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
    }
}

/// The four well-known roles are seeded.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_roles_seeded(pool: PgPool) {
    let roles = RoleRepo::list(&pool).await.unwrap();
    let names: Vec<&str> = roles.iter().map(|r| r.name.as_str()).collect();

    for expected in ["admin", "hr", "manager", "employee"] {
        assert!(names.contains(&expected), "role '{expected}' should be seeded");
    }
}

/// The approval form catalog is seeded with parseable templates.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_approval_forms_seeded(pool: PgPool) {
    let forms = FormRepo::list_active(&pool).await.unwrap();
    assert!(forms.len() >= 3, "expected at least three seeded forms");

    for form in &forms {
        let tokens = parse_approval_line_template(&form.auto_approval_line)
            .unwrap_or_else(|e| panic!("form {} template invalid: {e}", form.form_code));
        assert_eq!(
            tokens.len() as i32,
            form.max_approval_level,
            "form {} template levels must match max_approval_level",
            form.form_code
        );
    }

    let vacation = FormRepo::find_by_code(&pool, "VACATION").await.unwrap();
    assert!(vacation.is_some(), "VACATION form must be seeded");
    assert!(vacation.unwrap().is_active);
}
