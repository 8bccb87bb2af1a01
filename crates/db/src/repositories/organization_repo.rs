//! Repositories for the organizational hierarchy tables.
//!
//! One repository per level (company, sub-company, department, position),
//! all following the same CRUD + soft-deactivate shape. Deactivation
//! returns `false` on a second call so callers can report "already
//! inactive" instead of silently succeeding.

use smarthr_core::types::DbId;
use sqlx::PgPool;

use crate::models::organization::{
    Company, CreateCompany, CreateDepartment, CreatePosition, CreateSubCompany, Department,
    Position, SubCompany, UpdateCompany, UpdateDepartment, UpdatePosition, UpdateSubCompany,
};

const COMPANY_COLUMNS: &str = "id, code, name, is_active, created_at, updated_at";
const SUB_COMPANY_COLUMNS: &str = "id, company_id, name, is_active, created_at, updated_at";
const DEPARTMENT_COLUMNS: &str =
    "id, sub_company_id, name, manager_id, is_active, created_at, updated_at";
const POSITION_COLUMNS: &str =
    "id, department_id, name, grade_level, is_active, created_at, updated_at";

/// Provides CRUD operations for companies.
pub struct CompanyRepo;

impl CompanyRepo {
    pub async fn create(pool: &PgPool, input: &CreateCompany) -> Result<Company, sqlx::Error> {
        let query = format!(
            "INSERT INTO companies (code, name) VALUES ($1, $2) RETURNING {COMPANY_COLUMNS}"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(&input.code)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Company>, sqlx::Error> {
        let query = format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE id = $1");
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool, include_inactive: bool) -> Result<Vec<Company>, sqlx::Error> {
        let query = if include_inactive {
            format!("SELECT {COMPANY_COLUMNS} FROM companies ORDER BY name")
        } else {
            format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE is_active = true ORDER BY name")
        };
        sqlx::query_as::<_, Company>(&query).fetch_all(pool).await
    }

    /// Update a company. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCompany,
    ) -> Result<Option<Company>, sqlx::Error> {
        let query = format!(
            "UPDATE companies SET
                code = COALESCE($2, code),
                name = COALESCE($3, name)
             WHERE id = $1
             RETURNING {COMPANY_COLUMNS}"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .bind(&input.code)
            .bind(&input.name)
            .fetch_optional(pool)
            .await
    }

    /// Soft-deactivate. Returns `true` if the row was deactivated by this call.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE companies SET is_active = false WHERE id = $1 AND is_active = true")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Provides CRUD operations for sub-companies.
pub struct SubCompanyRepo;

impl SubCompanyRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateSubCompany,
    ) -> Result<SubCompany, sqlx::Error> {
        let query = format!(
            "INSERT INTO sub_companies (company_id, name)
             VALUES ($1, $2) RETURNING {SUB_COMPANY_COLUMNS}"
        );
        sqlx::query_as::<_, SubCompany>(&query)
            .bind(input.company_id)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<SubCompany>, sqlx::Error> {
        let query = format!("SELECT {SUB_COMPANY_COLUMNS} FROM sub_companies WHERE id = $1");
        sqlx::query_as::<_, SubCompany>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List sub-companies, optionally filtered to one parent company.
    pub async fn list(
        pool: &PgPool,
        company_id: Option<DbId>,
        include_inactive: bool,
    ) -> Result<Vec<SubCompany>, sqlx::Error> {
        let active_clause = if include_inactive {
            ""
        } else {
            "AND is_active = true"
        };
        let query = format!(
            "SELECT {SUB_COMPANY_COLUMNS} FROM sub_companies
             WHERE ($1::bigint IS NULL OR company_id = $1) {active_clause}
             ORDER BY name"
        );
        sqlx::query_as::<_, SubCompany>(&query)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSubCompany,
    ) -> Result<Option<SubCompany>, sqlx::Error> {
        let query = format!(
            "UPDATE sub_companies SET name = COALESCE($2, name)
             WHERE id = $1 RETURNING {SUB_COMPANY_COLUMNS}"
        );
        sqlx::query_as::<_, SubCompany>(&query)
            .bind(id)
            .bind(&input.name)
            .fetch_optional(pool)
            .await
    }

    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sub_companies SET is_active = false WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Provides CRUD operations for departments.
pub struct DepartmentRepo;

impl DepartmentRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateDepartment,
    ) -> Result<Department, sqlx::Error> {
        let query = format!(
            "INSERT INTO departments (sub_company_id, name)
             VALUES ($1, $2) RETURNING {DEPARTMENT_COLUMNS}"
        );
        sqlx::query_as::<_, Department>(&query)
            .bind(input.sub_company_id)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Department>, sqlx::Error> {
        let query = format!("SELECT {DEPARTMENT_COLUMNS} FROM departments WHERE id = $1");
        sqlx::query_as::<_, Department>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List departments, optionally filtered to one parent sub-company.
    pub async fn list(
        pool: &PgPool,
        sub_company_id: Option<DbId>,
        include_inactive: bool,
    ) -> Result<Vec<Department>, sqlx::Error> {
        let active_clause = if include_inactive {
            ""
        } else {
            "AND is_active = true"
        };
        let query = format!(
            "SELECT {DEPARTMENT_COLUMNS} FROM departments
             WHERE ($1::bigint IS NULL OR sub_company_id = $1) {active_clause}
             ORDER BY name"
        );
        sqlx::query_as::<_, Department>(&query)
            .bind(sub_company_id)
            .fetch_all(pool)
            .await
    }

    /// Update a department; `manager_id` is applied only when provided.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDepartment,
    ) -> Result<Option<Department>, sqlx::Error> {
        let query = format!(
            "UPDATE departments SET
                name = COALESCE($2, name),
                manager_id = COALESCE($3, manager_id)
             WHERE id = $1
             RETURNING {DEPARTMENT_COLUMNS}"
        );
        sqlx::query_as::<_, Department>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.manager_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE departments SET is_active = false WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Provides CRUD operations for positions.
pub struct PositionRepo;

impl PositionRepo {
    pub async fn create(pool: &PgPool, input: &CreatePosition) -> Result<Position, sqlx::Error> {
        let query = format!(
            "INSERT INTO positions (department_id, name, grade_level)
             VALUES ($1, $2, COALESCE($3, 1)) RETURNING {POSITION_COLUMNS}"
        );
        sqlx::query_as::<_, Position>(&query)
            .bind(input.department_id)
            .bind(&input.name)
            .bind(input.grade_level)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Position>, sqlx::Error> {
        let query = format!("SELECT {POSITION_COLUMNS} FROM positions WHERE id = $1");
        sqlx::query_as::<_, Position>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List positions, optionally filtered to one parent department.
    pub async fn list(
        pool: &PgPool,
        department_id: Option<DbId>,
        include_inactive: bool,
    ) -> Result<Vec<Position>, sqlx::Error> {
        let active_clause = if include_inactive {
            ""
        } else {
            "AND is_active = true"
        };
        let query = format!(
            "SELECT {POSITION_COLUMNS} FROM positions
             WHERE ($1::bigint IS NULL OR department_id = $1) {active_clause}
             ORDER BY grade_level, name"
        );
        sqlx::query_as::<_, Position>(&query)
            .bind(department_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePosition,
    ) -> Result<Option<Position>, sqlx::Error> {
        let query = format!(
            "UPDATE positions SET
                name = COALESCE($2, name),
                grade_level = COALESCE($3, grade_level)
             WHERE id = $1
             RETURNING {POSITION_COLUMNS}"
        );
        sqlx::query_as::<_, Position>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.grade_level)
            .fetch_optional(pool)
            .await
    }

    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE positions SET is_active = false WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
