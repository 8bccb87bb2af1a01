//! Shared fixtures for repository integration tests.
//!
//! Seeds a minimal organizational tree (one company, sub-company,
//! department, position) plus employees in the roles the approval
//! workflow needs.

use smarthr_db::models::employee::{CreateEmployee, Employee};
use smarthr_db::models::organization::{
    CreateCompany, CreateDepartment, CreatePosition, CreateSubCompany, UpdateDepartment,
};
use smarthr_db::repositories::{
    CompanyRepo, DepartmentRepo, EmployeeRepo, PositionRepo, RoleRepo, SubCompanyRepo,
};
use sqlx::PgPool;

/// IDs of the seeded organizational tree.
pub struct OrgFixture {
    pub company_id: i64,
    pub sub_company_id: i64,
    pub department_id: i64,
    pub position_id: i64,
}

/// Create one company -> sub-company -> department -> position chain.
pub async fn seed_org(pool: &PgPool) -> OrgFixture {
    seed_org_named(pool, "ACME", "ACME Korea", "Engineering").await
}

/// Create an organizational chain with custom names (for a second branch).
pub async fn seed_org_named(
    pool: &PgPool,
    code: &str,
    company: &str,
    department: &str,
) -> OrgFixture {
    let company = CompanyRepo::create(
        pool,
        &CreateCompany {
            code: code.to_string(),
            name: company.to_string(),
        },
    )
    .await
    .expect("company creation should succeed");

    let sub_company = SubCompanyRepo::create(
        pool,
        &CreateSubCompany {
            company_id: company.id,
            name: format!("{} HQ", company.name),
        },
    )
    .await
    .expect("sub-company creation should succeed");

    let department = DepartmentRepo::create(
        pool,
        &CreateDepartment {
            sub_company_id: sub_company.id,
            name: department.to_string(),
        },
    )
    .await
    .expect("department creation should succeed");

    let position = PositionRepo::create(
        pool,
        &CreatePosition {
            department_id: department.id,
            name: "Staff".to_string(),
            grade_level: Some(1),
        },
    )
    .await
    .expect("position creation should succeed");

    OrgFixture {
        company_id: company.id,
        sub_company_id: sub_company.id,
        department_id: department.id,
        position_id: position.id,
    }
}

/// Look up a seeded role id by name.
pub async fn role_id(pool: &PgPool, name: &str) -> i64 {
    RoleRepo::find_by_name(pool, name)
        .await
        .expect("role lookup should succeed")
        .unwrap_or_else(|| panic!("role '{name}' should be seeded"))
        .id
}

/// Create an employee in the given org slot. The password hash is a
/// placeholder; repository tests never verify passwords.
pub async fn seed_employee(
    pool: &PgPool,
    org: &OrgFixture,
    code: &str,
    role: &str,
) -> Employee {
    let role_id = role_id(pool, role).await;
    let input = CreateEmployee {
        employee_code: code.to_string(),
        email: format!("{}@smarthr.example", code.to_lowercase()),
        password_hash: "$argon2id$placeholder".to_string(),
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
    .expect("department update should succeed")
    .expect("department should exist");
}
