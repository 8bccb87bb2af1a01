//! Handlers for the approval workflow.
//!
//! Document creation and processing delegate to the transactional
//! repository operations; these handlers own input validation and access
//! control (who may see a document).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use smarthr_core::error::CoreError;
use smarthr_core::roles::{ROLE_ADMIN, ROLE_HR};
use smarthr_core::types::DbId;
use smarthr_db::models::approval::{
    ApprovalDocument, ApprovalForm, CreateDocument, DocumentDetail,
};
use smarthr_db::repositories::{DocumentRepo, FormRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /approval/documents`.
#[derive(Debug, Deserialize)]
pub struct CreateDocumentRequest {
    pub form_id: DbId,
    pub title: String,
    #[serde(default)]
    pub content: serde_json::Value,
}

/// Request body for `POST /approval/documents/{id}/process`.
#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    /// `APPROVE` or `REJECT`.
    pub action: String,
    pub comment: Option<String>,
}

/// Query parameters for `GET /approval/my-documents`.
#[derive(Debug, Deserialize)]
pub struct MyDocumentsParams {
    pub status: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/approval/forms
///
/// The active form catalog.
pub async fn list_forms(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<ApprovalForm>>>> {
    let forms = FormRepo::list_active(&state.pool).await?;
    Ok(Json(DataResponse { data: forms }))
}

/// POST /api/approval/documents
///
/// Create an approval document from a form. The document, its full
/// approval line, and the initial history entry are created atomically.
pub async fn create_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateDocumentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ApprovalDocument>>)> {
    if input.title.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Document title must not be empty".into(),
        )));
    }

    let create = CreateDocument {
        form_id: input.form_id,
        title: input.title,
        content: input.content,
        requester_id: auth.employee_id,
    };

    let document = DocumentRepo::create(&state.pool, &create).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: document })))
}

/// GET /api/approval/documents/{id}
///
/// A document with its ordered lines and history. Visible to the
/// requester, anyone on the approval line, and HR/admin.
pub async fn get_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DocumentDetail>>> {
    let detail = DocumentRepo::get_detail(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ApprovalDocument",
            id,
        }))?;

    let is_requester = detail.document.requester_id == auth.employee_id;
    let is_privileged = auth.role == ROLE_ADMIN || auth.role == ROLE_HR;
    let is_approver = detail
        .lines
        .iter()
        .any(|line| line.approver_id == auth.employee_id);
    if !is_requester && !is_privileged && !is_approver {
        return Err(AppError::Core(CoreError::Forbidden(
            "No access to this document".into(),
        )));
    }

    Ok(Json(DataResponse { data: detail }))
}

/// POST /api/approval/documents/{id}/process
///
/// Approve or reject the document at its current level. The caller must be
/// the designated approver of the next pending line.
pub async fn process_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<ProcessRequest>,
) -> AppResult<Json<DataResponse<ApprovalDocument>>> {
    let document = DocumentRepo::process(
        &state.pool,
        id,
        auth.employee_id,
        &input.action,
        input.comment.as_deref(),
    )
    .await?;

    Ok(Json(DataResponse { data: document }))
}

/// GET /api/approval/pending
///
/// Documents waiting on the caller's approval, oldest first.
pub async fn list_pending(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<ApprovalDocument>>>> {
    let documents = DocumentRepo::list_pending_for(&state.pool, auth.employee_id).await?;
    Ok(Json(DataResponse { data: documents }))
}

/// GET /api/approval/my-documents
///
/// Documents the caller requested, newest first, optionally filtered by
/// status.
pub async fn list_my_documents(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<MyDocumentsParams>,
) -> AppResult<Json<DataResponse<Vec<ApprovalDocument>>>> {
    let documents = DocumentRepo::list_for_requester(
        &state.pool,
        auth.employee_id,
        params.status.as_deref(),
    )
    .await?;
    Ok(Json(DataResponse { data: documents }))
}
