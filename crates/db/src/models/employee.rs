//! Employee entity model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use smarthr_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Full employee row from the `employees` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. Use [`EmployeeResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct Employee {
    pub id: DbId,
    pub employee_code: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role_id: DbId,
    pub company_id: DbId,
    pub sub_company_id: DbId,
    pub department_id: DbId,
    pub position_id: DbId,
    pub hire_date: NaiveDate,
    pub retire_date: Option<Timestamp>,
    pub is_active: bool,
    pub is_locked: bool,
    pub failed_login_count: i32,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe employee representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeResponse {
    pub id: DbId,
    pub employee_code: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Resolved role name (e.g. `"hr"`, `"manager"`).
    pub role: String,
    pub role_id: DbId,
    pub company_id: DbId,
    pub sub_company_id: DbId,
    pub department_id: DbId,
    pub position_id: DbId,
    pub hire_date: NaiveDate,
    pub retire_date: Option<Timestamp>,
    pub is_active: bool,
    pub is_locked: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for inserting a new employee (password already hashed).
#[derive(Debug, Deserialize)]
pub struct CreateEmployee {
    pub employee_code: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role_id: DbId,
    pub company_id: DbId,
    pub sub_company_id: DbId,
    pub department_id: DbId,
    pub position_id: DbId,
    pub hire_date: Option<NaiveDate>,
}

/// DTO for updating an employee's profile fields. All fields are optional.
///
/// Organizational coordinates are intentionally absent: those change only
/// through the assignment/transfer operation, which records history.
#[derive(Debug, Deserialize)]
pub struct UpdateEmployee {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role_id: Option<DbId>,
}
