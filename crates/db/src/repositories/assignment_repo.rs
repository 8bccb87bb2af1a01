//! Repository for employee transfers and the `assignment_history` table.

use smarthr_core::types::DbId;
use sqlx::PgPool;

use crate::models::assignment::{AssignmentRecord, TransferInput};

const COLUMNS: &str = "id, employee_id, prev_company_id, prev_sub_company_id, \
    prev_department_id, prev_position_id, new_company_id, new_sub_company_id, \
    new_department_id, new_position_id, assignment_type, effective_date, reason, \
    created_by, created_at";

/// Provides the transactional transfer operation and history reads.
pub struct AssignmentRepo;

impl AssignmentRepo {
    /// Move an employee to a new organizational tuple.
    ///
    /// Updates the employee's coordinates and appends the history row in one
    /// transaction; both succeed or neither does. The employee row is locked
    /// for the duration so concurrent transfers cannot interleave and record
    /// a stale `prev_*` tuple.
    pub async fn transfer(
        pool: &PgPool,
        employee_id: DbId,
        input: &TransferInput,
    ) -> Result<AssignmentRecord, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let prev: (DbId, DbId, DbId, DbId) = sqlx::query_as(
            "SELECT company_id, sub_company_id, department_id, position_id
             FROM employees WHERE id = $1 FOR UPDATE",
        )
        .bind(employee_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE employees SET
                company_id = $2,
                sub_company_id = $3,
                department_id = $4,
                position_id = $5
             WHERE id = $1",
        )
        .bind(employee_id)
        .bind(input.company_id)
        .bind(input.sub_company_id)
        .bind(input.department_id)
        .bind(input.position_id)
        .execute(&mut *tx)
        .await?;

        let insert_query = format!(
            "INSERT INTO assignment_history
                (employee_id, prev_company_id, prev_sub_company_id, prev_department_id,
                 prev_position_id, new_company_id, new_sub_company_id, new_department_id,
                 new_position_id, assignment_type, effective_date, reason, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {COLUMNS}"
        );
        let record = sqlx::query_as::<_, AssignmentRecord>(&insert_query)
            .bind(employee_id)
            .bind(prev.0)
            .bind(prev.1)
            .bind(prev.2)
            .bind(prev.3)
            .bind(input.company_id)
            .bind(input.sub_company_id)
            .bind(input.department_id)
            .bind(input.position_id)
            .bind(&input.assignment_type)
            .bind(input.effective_date)
            .bind(&input.reason)
            .bind(input.created_by)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(record)
    }

    /// List an employee's assignment records, newest first.
    pub async fn list_for_employee(
        pool: &PgPool,
        employee_id: DbId,
    ) -> Result<Vec<AssignmentRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM assignment_history
             WHERE employee_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, AssignmentRecord>(&query)
            .bind(employee_id)
            .fetch_all(pool)
            .await
    }
}
