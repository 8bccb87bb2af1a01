//! Handlers for the vacation flow.
//!
//! Vacation requests are approval documents created from the seeded
//! `VACATION` form; these handlers shape the request into document content
//! and project vacation-specific views back out.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use smarthr_core::error::CoreError;
use smarthr_db::models::approval::{ApprovalDocument, CreateDocument};
use smarthr_db::models::vacation::TeamVacationEntry;
use smarthr_db::repositories::{DocumentRepo, FormRepo, VacationRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Form code of the seeded vacation form.
const VACATION_FORM_CODE: &str = "VACATION";

/// Request body for `POST /vacation/request`.
#[derive(Debug, Deserialize)]
pub struct VacationRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// E.g. `ANNUAL`, `HALF_DAY`, `SICK`.
    pub vacation_type: String,
    pub reason: Option<String>,
}

/// POST /api/vacation/request
///
/// Create a vacation approval document for the caller.
pub async fn request_vacation(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<VacationRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ApprovalDocument>>)> {
    if input.end_date < input.start_date {
        return Err(AppError::Core(CoreError::Validation(
            "end_date must not be before start_date".into(),
        )));
    }
    if input.vacation_type.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "vacation_type must not be empty".into(),
        )));
    }

    let form = FormRepo::find_by_code(&state.pool, VACATION_FORM_CODE)
        .await?
        .ok_or_else(|| {
            AppError::InternalError("Vacation approval form is not installed".into())
        })?;

    let title = format!(
        "{} {} ~ {}",
        input.vacation_type, input.start_date, input.end_date
    );
    let content = json!({
        "start_date": input.start_date,
        "end_date": input.end_date,
        "vacation_type": input.vacation_type,
        "reason": input.reason,
    });

    let create = CreateDocument {
        form_id: form.id,
        title,
        content,
        requester_id: auth.employee_id,
    };
    let document = DocumentRepo::create(&state.pool, &create).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: document })))
}

/// GET /api/vacation/my-requests
///
/// The caller's vacation documents, newest first.
pub async fn list_my_requests(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<ApprovalDocument>>>> {
    let documents =
        VacationRepo::list_requests_for(&state.pool, auth.employee_id, VACATION_FORM_CODE).await?;
    Ok(Json(DataResponse { data: documents }))
}

/// GET /api/vacation/team-status
///
/// Vacation documents of the caller's department colleagues.
pub async fn team_status(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<TeamVacationEntry>>>> {
    let entries =
        VacationRepo::team_status(&state.pool, auth.department_id, VACATION_FORM_CODE).await?;
    Ok(Json(DataResponse { data: entries }))
}
