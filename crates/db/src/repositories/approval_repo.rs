//! Repositories for the approval workflow tables.
//!
//! [`DocumentRepo::create`] and [`DocumentRepo::process`] are the two
//! multi-step operations of the workflow. Each runs inside a single
//! transaction with the governing row locked (`FOR UPDATE`): creation locks
//! the form row so document numbers are allocated serially per form, and
//! processing locks the document row so two concurrent approvals of the same
//! level cannot both pass the still-pending check.

use sqlx::{PgPool, Postgres, Transaction};

use smarthr_core::approval::{
    is_actionable, next_document_state, parse_approval_line_template, validate_action,
    validate_required_fields, ACTION_DRAFT, DOC_STATUS_IN_PROGRESS, DOC_STATUS_PENDING,
    LINE_STATUS_PENDING,
};
use smarthr_core::document_number::{format_document_number, month_prefix};
use smarthr_core::error::CoreError;
use smarthr_core::roles::{APPROVER_DEPT_MANAGER, APPROVER_HR_MANAGER, APPROVER_HR_TEAM, ROLE_HR};
use smarthr_core::types::DbId;

use crate::models::approval::{
    ApprovalDocument, ApprovalForm, ApprovalHistoryEntry, ApprovalLine, CreateDocument,
    DocumentDetail,
};
use crate::DbError;

const FORM_COLUMNS: &str = "id, form_code, form_name, field_schema, required_fields, \
    auto_approval_line, max_approval_level, is_active, created_at, updated_at";

const DOC_COLUMNS: &str = "id, document_number, form_id, title, content, requester_id, \
    status, current_level, total_level, processed_at, created_at, updated_at";

const LINE_COLUMNS: &str =
    "id, document_id, level, approver_id, status, comment, processed_at, created_at, updated_at";

const HISTORY_COLUMNS: &str =
    "id, document_id, actor_id, action_type, comment, resulting_status, created_at";

/// Provides read operations for the approval form catalog.
pub struct FormRepo;

impl FormRepo {
    /// List active forms ordered by code.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<ApprovalForm>, sqlx::Error> {
        let query = format!(
            "SELECT {FORM_COLUMNS} FROM approval_forms
             WHERE is_active = true ORDER BY form_code"
        );
        sqlx::query_as::<_, ApprovalForm>(&query).fetch_all(pool).await
    }

    /// Find a form by its unique code (e.g. `VACATION`).
    pub async fn find_by_code(
        pool: &PgPool,
        form_code: &str,
    ) -> Result<Option<ApprovalForm>, sqlx::Error> {
        let query = format!("SELECT {FORM_COLUMNS} FROM approval_forms WHERE form_code = $1");
        sqlx::query_as::<_, ApprovalForm>(&query)
            .bind(form_code)
            .fetch_optional(pool)
            .await
    }
}

/// Provides the approval document lifecycle operations.
pub struct DocumentRepo;

impl DocumentRepo {
    /// Create a new approval document with its full approval line.
    ///
    /// In one transaction: locks and validates the form, allocates the
    /// month-scoped document number, inserts the document at level 0 in
    /// `PENDING` status, expands the form's template into one line per
    /// level (resolving each role token to a concrete approver), and
    /// appends the `DRAFT` history entry. Any failure rolls the whole
    /// thing back; a partially-created document is never observable.
    pub async fn create(
        pool: &PgPool,
        input: &CreateDocument,
    ) -> Result<ApprovalDocument, DbError> {
        let mut tx = pool.begin().await?;

        let form_query = format!(
            "SELECT {FORM_COLUMNS} FROM approval_forms WHERE id = $1 FOR UPDATE"
        );
        let form = sqlx::query_as::<_, ApprovalForm>(&form_query)
            .bind(input.form_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "ApprovalForm",
                id: input.form_id,
            })?;

        if !form.is_active {
            return Err(CoreError::InvalidState(format!(
                "Form '{}' is inactive",
                form.form_code
            ))
            .into());
        }

        validate_required_fields(&input.content, &form.required_fields)
            .map_err(CoreError::Validation)?;

        let tokens =
            parse_approval_line_template(&form.auto_approval_line).map_err(CoreError::Internal)?;
        if tokens.len() as i32 != form.max_approval_level {
            return Err(CoreError::Internal(format!(
                "Form '{}' declares {} levels but its template has {}",
                form.form_code,
                form.max_approval_level,
                tokens.len()
            ))
            .into());
        }

        let requester: Option<(DbId,)> = sqlx::query_as(
            "SELECT department_id FROM employees WHERE id = $1 AND is_active = true",
        )
        .bind(input.requester_id)
        .fetch_optional(&mut *tx)
        .await?;
        let (requester_department_id,) = requester.ok_or(CoreError::NotFound {
            entity: "Employee",
            id: input.requester_id,
        })?;

        // The form row lock serializes number allocation per form.
        let now = chrono::Utc::now();
        let prefix = month_prefix(&form.form_code, now);
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM approval_documents WHERE document_number LIKE $1 || '%'",
        )
        .bind(&prefix)
        .fetch_one(&mut *tx)
        .await?;
        let document_number = format_document_number(&form.form_code, now, count.0 + 1);

        let insert_query = format!(
            "INSERT INTO approval_documents
                (document_number, form_id, title, content, requester_id, status,
                 current_level, total_level)
             VALUES ($1, $2, $3, $4, $5, $6, 0, $7)
             RETURNING {DOC_COLUMNS}"
        );
        let document = sqlx::query_as::<_, ApprovalDocument>(&insert_query)
            .bind(&document_number)
            .bind(form.id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.requester_id)
            .bind(DOC_STATUS_PENDING)
            .bind(form.max_approval_level)
            .fetch_one(&mut *tx)
            .await?;

        for (index, token) in tokens.iter().enumerate() {
            let level = index as i32 + 1;
            let approver_id =
                resolve_approver(&mut tx, token, requester_department_id).await?;
            sqlx::query(
                "INSERT INTO approval_lines (document_id, level, approver_id, status)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(document.id)
            .bind(level)
            .bind(approver_id)
            .bind(LINE_STATUS_PENDING)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            "INSERT INTO approval_history
                (document_id, actor_id, action_type, resulting_status)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(document.id)
        .bind(input.requester_id)
        .bind(ACTION_DRAFT)
        .bind(DOC_STATUS_PENDING)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            document_id = document.id,
            document_number = %document.document_number,
            form_code = %form.form_code,
            requester_id = input.requester_id,
            "Approval document created"
        );

        Ok(document)
    }

    /// Process one approval action (`APPROVE` or `REJECT`) on a document.
    ///
    /// The document row is locked for the duration of the transaction; the
    /// caller must own the still-pending line at `current_level + 1` or the
    /// operation fails with no-approval-authority semantics. Line update,
    /// document transition, and history entry commit atomically.
    pub async fn process(
        pool: &PgPool,
        document_id: DbId,
        approver_id: DbId,
        action: &str,
        comment: Option<&str>,
    ) -> Result<ApprovalDocument, DbError> {
        validate_action(action).map_err(CoreError::Validation)?;

        let mut tx = pool.begin().await?;

        let doc_query = format!(
            "SELECT {DOC_COLUMNS} FROM approval_documents WHERE id = $1 FOR UPDATE"
        );
        let document = sqlx::query_as::<_, ApprovalDocument>(&doc_query)
            .bind(document_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "ApprovalDocument",
                id: document_id,
            })?;

        if !is_actionable(&document.status) {
            return Err(CoreError::InvalidState(format!(
                "Document in status '{}' cannot be processed",
                document.status
            ))
            .into());
        }

        let line_query = format!(
            "SELECT {LINE_COLUMNS} FROM approval_lines
             WHERE document_id = $1 AND level = $2"
        );
        let line = sqlx::query_as::<_, ApprovalLine>(&line_query)
            .bind(document.id)
            .bind(document.current_level + 1)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| {
                CoreError::Internal(format!(
                    "Approval line missing for document {} level {}",
                    document.id,
                    document.current_level + 1
                ))
            })?;

        if line.approver_id != approver_id || line.status != LINE_STATUS_PENDING {
            return Err(CoreError::Forbidden(
                "No approval authority for this document at its current level".into(),
            )
            .into());
        }

        let transition = next_document_state(
            &document.status,
            document.current_level,
            document.total_level,
            action,
        )
        .map_err(CoreError::InvalidState)?;

        sqlx::query(
            "UPDATE approval_lines SET status = $2, comment = $3, processed_at = NOW()
             WHERE id = $1",
        )
        .bind(line.id)
        .bind(transition.line_status)
        .bind(comment)
        .execute(&mut *tx)
        .await?;

        let update_query = format!(
            "UPDATE approval_documents SET
                status = $2,
                current_level = $3,
                processed_at = CASE WHEN $4 THEN NOW() ELSE processed_at END
             WHERE id = $1
             RETURNING {DOC_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, ApprovalDocument>(&update_query)
            .bind(document.id)
            .bind(transition.document_status)
            .bind(transition.current_level)
            .bind(transition.terminal)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO approval_history
                (document_id, actor_id, action_type, comment, resulting_status)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(document.id)
        .bind(approver_id)
        .bind(action)
        .bind(comment)
        .bind(transition.document_status)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            document_id = document.id,
            approver_id,
            action,
            status = transition.document_status,
            level = transition.current_level,
            "Approval document processed"
        );

        Ok(updated)
    }

    /// Find a document by internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ApprovalDocument>, sqlx::Error> {
        let query = format!("SELECT {DOC_COLUMNS} FROM approval_documents WHERE id = $1");
        sqlx::query_as::<_, ApprovalDocument>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load a document together with its ordered lines and history.
    pub async fn get_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<DocumentDetail>, sqlx::Error> {
        let document = match Self::find_by_id(pool, id).await? {
            Some(document) => document,
            None => return Ok(None),
        };
        let lines = Self::lines_for(pool, id).await?;
        let history = Self::history_for(pool, id).await?;
        Ok(Some(DocumentDetail {
            document,
            lines,
            history,
        }))
    }

    /// The ordered approval line of a document.
    pub async fn lines_for(pool: &PgPool, document_id: DbId) -> Result<Vec<ApprovalLine>, sqlx::Error> {
        let query = format!(
            "SELECT {LINE_COLUMNS} FROM approval_lines
             WHERE document_id = $1 ORDER BY level"
        );
        sqlx::query_as::<_, ApprovalLine>(&query)
            .bind(document_id)
            .fetch_all(pool)
            .await
    }

    /// A document's history trail, oldest first.
    pub async fn history_for(
        pool: &PgPool,
        document_id: DbId,
    ) -> Result<Vec<ApprovalHistoryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {HISTORY_COLUMNS} FROM approval_history
             WHERE document_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, ApprovalHistoryEntry>(&query)
            .bind(document_id)
            .fetch_all(pool)
            .await
    }

    /// Documents whose next actionable line belongs to the given approver,
    /// oldest first.
    pub async fn list_pending_for(
        pool: &PgPool,
        approver_id: DbId,
    ) -> Result<Vec<ApprovalDocument>, sqlx::Error> {
        sqlx::query_as::<_, ApprovalDocument>(
            "SELECT d.id, d.document_number, d.form_id, d.title, d.content, d.requester_id,
                    d.status, d.current_level, d.total_level, d.processed_at,
                    d.created_at, d.updated_at
             FROM approval_documents d
             JOIN approval_lines l
               ON l.document_id = d.id AND l.level = d.current_level + 1
             WHERE l.approver_id = $1
               AND l.status = $2
               AND d.status IN ($3, $4)
             ORDER BY d.created_at, d.id",
        )
        .bind(approver_id)
        .bind(LINE_STATUS_PENDING)
        .bind(DOC_STATUS_PENDING)
        .bind(DOC_STATUS_IN_PROGRESS)
        .fetch_all(pool)
        .await
    }

    /// Documents requested by the given employee, newest first, optionally
    /// filtered by status.
    pub async fn list_for_requester(
        pool: &PgPool,
        requester_id: DbId,
        status: Option<&str>,
    ) -> Result<Vec<ApprovalDocument>, sqlx::Error> {
        let query = format!(
            "SELECT {DOC_COLUMNS} FROM approval_documents
             WHERE requester_id = $1 AND ($2::text IS NULL OR status = $2)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, ApprovalDocument>(&query)
            .bind(requester_id)
            .bind(status)
            .fetch_all(pool)
            .await
    }

}

/// Resolve an approval-line role token to a concrete approver.
///
/// - `DEPT_MANAGER`: the manager of the requester's department.
/// - `HR_TEAM`: the first active HR-role employee by employee code.
/// - `HR_MANAGER`: the manager of the HR team's department.
///
/// Fails (rolling back the enclosing transaction) when a token cannot be
/// resolved to an active employee.
async fn resolve_approver(
    tx: &mut Transaction<'_, Postgres>,
    token: &str,
    requester_department_id: DbId,
) -> Result<DbId, DbError> {
    let resolved: Option<DbId> = match token {
        APPROVER_DEPT_MANAGER => {
            let row: Option<(Option<DbId>,)> = sqlx::query_as(
                "SELECT manager_id FROM departments WHERE id = $1 AND is_active = true",
            )
            .bind(requester_department_id)
            .fetch_optional(&mut **tx)
            .await?;
            row.and_then(|(manager_id,)| manager_id)
        }
        APPROVER_HR_TEAM => {
            let row: Option<(DbId,)> = sqlx::query_as(
                "SELECT e.id FROM employees e
                 JOIN roles r ON r.id = e.role_id
                 WHERE r.name = $1 AND e.is_active = true
                 ORDER BY e.employee_code
                 LIMIT 1",
            )
            .bind(ROLE_HR)
            .fetch_optional(&mut **tx)
            .await?;
            row.map(|(id,)| id)
        }
        APPROVER_HR_MANAGER => {
            let row: Option<(Option<DbId>,)> = sqlx::query_as(
                "SELECT d.manager_id FROM employees e
                 JOIN roles r ON r.id = e.role_id
                 JOIN departments d ON d.id = e.department_id
                 WHERE r.name = $1 AND e.is_active = true
                 ORDER BY e.employee_code
                 LIMIT 1",
            )
            .bind(ROLE_HR)
            .fetch_optional(&mut **tx)
            .await?;
            row.and_then(|(manager_id,)| manager_id)
        }
        other => {
            // parse_approval_line_template already screened tokens; an
            // unknown one here is a programming error.
            return Err(CoreError::Internal(format!(
                "Unhandled approver token '{other}'"
            ))
            .into());
        }
    };

    resolved.ok_or_else(|| {
        CoreError::Validation(format!(
            "Approver token '{token}' could not be resolved to an active employee"
        ))
        .into()
    })
}
