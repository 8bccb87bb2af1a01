//! Organizational hierarchy models: company, sub-company, department,
//! position. Each level references its parent; employees reference one node
//! at every level.

use serde::{Deserialize, Serialize};
use smarthr_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `companies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Company {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new company.
#[derive(Debug, Deserialize)]
pub struct CreateCompany {
    pub code: String,
    pub name: String,
}

/// DTO for updating a company. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateCompany {
    pub code: Option<String>,
    pub name: Option<String>,
}

/// A row from the `sub_companies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SubCompany {
    pub id: DbId,
    pub company_id: DbId,
    pub name: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new sub-company.
#[derive(Debug, Deserialize)]
pub struct CreateSubCompany {
    pub company_id: DbId,
    pub name: String,
}

/// DTO for updating a sub-company.
#[derive(Debug, Deserialize)]
pub struct UpdateSubCompany {
    pub name: Option<String>,
}

/// A row from the `departments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Department {
    pub id: DbId,
    pub sub_company_id: DbId,
    pub name: String,
    /// The employee managing this department; approval lines resolve
    /// `DEPT_MANAGER` through this reference.
    pub manager_id: Option<DbId>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new department.
#[derive(Debug, Deserialize)]
pub struct CreateDepartment {
    pub sub_company_id: DbId,
    pub name: String,
}

/// DTO for updating a department.
#[derive(Debug, Deserialize)]
pub struct UpdateDepartment {
    pub name: Option<String>,
    pub manager_id: Option<DbId>,
}

/// A row from the `positions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Position {
    pub id: DbId,
    pub department_id: DbId,
    pub name: String,
    pub grade_level: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new position.
#[derive(Debug, Deserialize)]
pub struct CreatePosition {
    pub department_id: DbId,
    pub name: String,
    pub grade_level: Option<i32>,
}

/// DTO for updating a position.
#[derive(Debug, Deserialize)]
pub struct UpdatePosition {
    pub name: Option<String>,
    pub grade_level: Option<i32>,
}
