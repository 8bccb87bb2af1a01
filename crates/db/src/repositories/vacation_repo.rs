//! Vacation read queries projected over approval documents.
//!
//! Vacation requests are ordinary approval documents created from the
//! `VACATION` form; these queries surface them by requester and by
//! department without duplicating any workflow state.

use smarthr_core::types::DbId;
use sqlx::PgPool;

use crate::models::approval::ApprovalDocument;
use crate::models::vacation::TeamVacationEntry;

/// Provides vacation-specific read operations.
pub struct VacationRepo;

impl VacationRepo {
    /// The given employee's vacation documents, newest first.
    pub async fn list_requests_for(
        pool: &PgPool,
        employee_id: DbId,
        form_code: &str,
    ) -> Result<Vec<ApprovalDocument>, sqlx::Error> {
        sqlx::query_as::<_, ApprovalDocument>(
            "SELECT d.id, d.document_number, d.form_id, d.title, d.content, d.requester_id,
                    d.status, d.current_level, d.total_level, d.processed_at,
                    d.created_at, d.updated_at
             FROM approval_documents d
             JOIN approval_forms f ON f.id = d.form_id
             WHERE d.requester_id = $1 AND f.form_code = $2
             ORDER BY d.created_at DESC, d.id DESC",
        )
        .bind(employee_id)
        .bind(form_code)
        .fetch_all(pool)
        .await
    }

    /// Vacation documents of a department's active members, newest first.
    ///
    /// Dates and type are pulled out of the document content JSON.
    pub async fn team_status(
        pool: &PgPool,
        department_id: DbId,
        form_code: &str,
    ) -> Result<Vec<TeamVacationEntry>, sqlx::Error> {
        sqlx::query_as::<_, TeamVacationEntry>(
            "SELECT e.id AS employee_id,
                    e.first_name,
                    e.last_name,
                    d.id AS document_id,
                    d.document_number,
                    d.title,
                    d.status,
                    d.content->>'start_date' AS start_date,
                    d.content->>'end_date' AS end_date,
                    d.content->>'vacation_type' AS vacation_type
             FROM approval_documents d
             JOIN approval_forms f ON f.id = d.form_id
             JOIN employees e ON e.id = d.requester_id
             WHERE e.department_id = $1
               AND e.is_active = true
               AND f.form_code = $2
             ORDER BY d.created_at DESC, d.id DESC",
        )
        .bind(department_id)
        .bind(form_code)
        .fetch_all(pool)
        .await
    }
}
