//! Handlers for the assignment/transfer flow.
//!
//! A transfer resolves unset coordinates to the employee's current values,
//! validates the resulting tuple against the hierarchy, rejects no-op
//! transfers, classifies the change, and then persists the employee update
//! plus the immutable history row in one transaction.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use smarthr_core::assignment::{AssignmentPolicy, CoordinateDiff};
use smarthr_core::error::CoreError;
use smarthr_core::types::DbId;
use smarthr_db::models::assignment::{AssignmentRecord, TransferInput};
use smarthr_db::repositories::{AssignmentRepo, EmployeeRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::organization::ensure_org_tuple_valid;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireHr;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /assignments/{employee_id}/transfer`.
///
/// Unset coordinates keep the employee's current value.
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub company_id: Option<DbId>,
    pub sub_company_id: Option<DbId>,
    pub department_id: Option<DbId>,
    pub position_id: Option<DbId>,
    /// Defaults to today.
    pub effective_date: Option<NaiveDate>,
    pub reason: Option<String>,
}

/// POST /api/assignments/{employee_id}/transfer
///
/// Move an employee within the organization. Requires `hr` or `admin`.
pub async fn transfer_employee(
    State(state): State<AppState>,
    RequireHr(hr): RequireHr,
    Path(employee_id): Path<DbId>,
    Json(input): Json<TransferRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<AssignmentRecord>>)> {
    let employee = EmployeeRepo::find_by_id(&state.pool, employee_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Employee",
            id: employee_id,
        }))?;

    if !employee.is_active {
        return Err(AppError::Core(CoreError::InvalidState(
            "Cannot transfer a retired employee".into(),
        )));
    }

    // Resolve unset coordinates to the current assignment.
    let company_id = input.company_id.unwrap_or(employee.company_id);
    let sub_company_id = input.sub_company_id.unwrap_or(employee.sub_company_id);
    let department_id = input.department_id.unwrap_or(employee.department_id);
    let position_id = input.position_id.unwrap_or(employee.position_id);

    // Every resolved coordinate must exist, be active, and sit under its
    // resolved parent.
    ensure_org_tuple_valid(
        &state.pool,
        company_id,
        sub_company_id,
        department_id,
        position_id,
    )
    .await?;

    // A target tuple identical to the current one is an error, not a
    // silent success.
    let diff = CoordinateDiff {
        company: company_id != employee.company_id,
        sub_company: sub_company_id != employee.sub_company_id,
        department: department_id != employee.department_id,
        position: position_id != employee.position_id,
    };
    let assignment_type = AssignmentPolicy::default()
        .classify(diff)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let transfer_input = TransferInput {
        company_id,
        sub_company_id,
        department_id,
        position_id,
        assignment_type: assignment_type.to_string(),
        effective_date: input
            .effective_date
            .unwrap_or_else(|| chrono::Utc::now().date_naive()),
        reason: input.reason,
        created_by: hr.employee_id,
    };

    let record = AssignmentRepo::transfer(&state.pool, employee_id, &transfer_input).await?;

    tracing::info!(
        employee_id,
        assignment_type,
        created_by = hr.employee_id,
        "Employee transferred"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

/// GET /api/assignments/{employee_id}/history
///
/// The employee's assignment records, newest first.
pub async fn get_assignment_history(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(employee_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<AssignmentRecord>>>> {
    EmployeeRepo::find_by_id(&state.pool, employee_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Employee",
            id: employee_id,
        }))?;

    let history = AssignmentRepo::list_for_employee(&state.pool, employee_id).await?;
    Ok(Json(DataResponse { data: history }))
}
