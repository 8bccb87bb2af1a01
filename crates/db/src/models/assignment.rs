//! Assignment history models and the transfer input DTO.

use chrono::NaiveDate;
use serde::Serialize;
use smarthr_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the append-only `assignment_history` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssignmentRecord {
    pub id: DbId,
    pub employee_id: DbId,
    pub prev_company_id: DbId,
    pub prev_sub_company_id: DbId,
    pub prev_department_id: DbId,
    pub prev_position_id: DbId,
    pub new_company_id: DbId,
    pub new_sub_company_id: DbId,
    pub new_department_id: DbId,
    pub new_position_id: DbId,
    /// Classification of the change (e.g. `DEPARTMENT_TRANSFER`).
    pub assignment_type: String,
    pub effective_date: NaiveDate,
    pub reason: Option<String>,
    pub created_by: DbId,
    pub created_at: Timestamp,
}

/// Fully-resolved transfer input handed to the repository.
///
/// All four coordinates are present: unset request fields were already
/// resolved to the employee's current values and validated against the
/// hierarchy by the caller.
#[derive(Debug, Clone)]
pub struct TransferInput {
    pub company_id: DbId,
    pub sub_company_id: DbId,
    pub department_id: DbId,
    pub position_id: DbId,
    pub assignment_type: String,
    pub effective_date: NaiveDate,
    pub reason: Option<String>,
    pub created_by: DbId,
}
