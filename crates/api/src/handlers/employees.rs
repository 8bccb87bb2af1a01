//! Handlers for the `/employees` resource.
//!
//! Mutations require the `hr` or `admin` role. Deleting an employee is a
//! soft delete: the row stays, `is_active` flips, and `retire_date` is
//! stamped. Organizational coordinates are not editable here -- transfers
//! go through the assignment flow so history is recorded.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use smarthr_core::employee::{validate_email, validate_employee_code, validate_name};
use smarthr_core::error::CoreError;
use smarthr_core::roles::{ROLE_ADMIN, ROLE_HR};
use smarthr_core::types::DbId;
use smarthr_db::models::employee::{CreateEmployee, Employee, EmployeeResponse, UpdateEmployee};
use smarthr_db::repositories::{EmployeeRepo, RoleRepo};

use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::handlers::organization::ensure_org_tuple_valid;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireHr;
use crate::query::{clamp_limit, clamp_offset, IncludeInactiveParams, PaginationParams};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /employees`.
#[derive(Debug, Deserialize)]
pub struct CreateEmployeeRequest {
    pub employee_code: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role_id: DbId,
    pub company_id: DbId,
    pub sub_company_id: DbId,
    pub department_id: DbId,
    pub position_id: DbId,
    pub hire_date: Option<NaiveDate>,
}

/// Request body for `PUT /employees/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateEmployeeRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role_id: Option<DbId>,
}

/// Request body for `POST /employees/{id}/change-password`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    /// Required when changing one's own password; ignored for HR/admin.
    pub current_password: Option<String>,
    pub new_password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/employees
///
/// Create a new employee. Validates identity fields and the organizational
/// tuple, hashes the password, and returns a safe [`EmployeeResponse`] with
/// 201 Created.
pub async fn create_employee(
    State(state): State<AppState>,
    RequireHr(_hr): RequireHr,
    Json(input): Json<CreateEmployeeRequest>,
) -> AppResult<(StatusCode, Json<EmployeeResponse>)> {
    validate_employee_code(&input.employee_code)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    validate_email(&input.email).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    validate_name(&input.first_name, "first_name")
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    validate_name(&input.last_name, "last_name")
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    // Role must exist.
    RoleRepo::find_by_id(&state.pool, input.role_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Role",
            id: input.role_id,
        }))?;

    // Every organizational coordinate must be active and belong to its parent.
    ensure_org_tuple_valid(
        &state.pool,
        input.company_id,
        input.sub_company_id,
        input.department_id,
        input.position_id,
    )
    .await?;

    let hashed = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let create_dto = CreateEmployee {
        employee_code: input.employee_code,
        email: input.email,
        password_hash: hashed,
        first_name: input.first_name,
        last_name: input.last_name,
        role_id: input.role_id,
        company_id: input.company_id,
        sub_company_id: input.sub_company_id,
        department_id: input.department_id,
        position_id: input.position_id,
        hire_date: input.hire_date,
    };

    let employee = EmployeeRepo::create(&state.pool, &create_dto).await?;
    let response = employee_to_response(&state, &employee).await?;

    tracing::info!(
        employee_id = employee.id,
        employee_code = %employee.employee_code,
        "Employee created"
    );

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/employees
///
/// List employees with pagination; retired employees only when
/// `include_inactive=true`.
pub async fn list_employees(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(pagination): Query<PaginationParams>,
    Query(flags): Query<IncludeInactiveParams>,
) -> AppResult<Json<Vec<EmployeeResponse>>> {
    let employees = EmployeeRepo::list(
        &state.pool,
        flags.include_inactive,
        clamp_limit(pagination.limit),
        clamp_offset(pagination.offset),
    )
    .await?;

    // Pre-fetch all roles to avoid N+1 queries.
    let roles = RoleRepo::list(&state.pool).await?;

    let responses: Vec<EmployeeResponse> = employees
        .iter()
        .map(|e| {
            let role_name = roles
                .iter()
                .find(|r| r.id == e.role_id)
                .map(|r| r.name.clone())
                .unwrap_or_else(|| "unknown".to_string());
            build_employee_response(e, role_name)
        })
        .collect();

    Ok(Json(responses))
}

/// GET /api/employees/{id}
pub async fn get_employee(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<EmployeeResponse>> {
    let employee = EmployeeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Employee",
            id,
        }))?;

    let response = employee_to_response(&state, &employee).await?;
    Ok(Json(response))
}

/// PUT /api/employees/{id}
///
/// Update an employee's profile fields (not password, not coordinates).
pub async fn update_employee(
    State(state): State<AppState>,
    RequireHr(_hr): RequireHr,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEmployeeRequest>,
) -> AppResult<Json<EmployeeResponse>> {
    if let Some(email) = &input.email {
        validate_email(email).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    }
    if let Some(role_id) = input.role_id {
        RoleRepo::find_by_id(&state.pool, role_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Role",
                id: role_id,
            }))?;
    }

    let update_dto = UpdateEmployee {
        email: input.email,
        first_name: input.first_name,
        last_name: input.last_name,
        role_id: input.role_id,
    };

    let employee = EmployeeRepo::update(&state.pool, id, &update_dto)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Employee",
            id,
        }))?;

    let response = employee_to_response(&state, &employee).await?;
    Ok(Json(response))
}

/// DELETE /api/employees/{id}
///
/// Soft-delete an employee: sets `is_active = false` and stamps
/// `retire_date`. A second delete fails with 409. Returns 204 No Content.
pub async fn delete_employee(
    State(state): State<AppState>,
    RequireHr(_hr): RequireHr,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let employee = EmployeeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Employee",
            id,
        }))?;

    if !employee.is_active {
        return Err(AppError::Core(CoreError::Conflict(
            "Employee is already retired".into(),
        )));
    }

    let deleted = EmployeeRepo::soft_delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(employee_id = id, "Employee retired (soft delete)");
        Ok(StatusCode::NO_CONTENT)
    } else {
        // Lost a race with a concurrent delete.
        Err(AppError::Core(CoreError::Conflict(
            "Employee is already retired".into(),
        )))
    }
}

/// POST /api/employees/{id}/change-password
///
/// Change an employee's password. Employees change their own password by
/// supplying the current one; HR/admin may reset anyone's without it.
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    let is_self = auth.employee_id == id;
    let is_privileged = auth.role == ROLE_ADMIN || auth.role == ROLE_HR;
    if !is_self && !is_privileged {
        return Err(AppError::Core(CoreError::Forbidden(
            "Cannot change another employee's password".into(),
        )));
    }

    let employee = EmployeeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Employee",
            id,
        }))?;

    if is_self {
        let current = input.current_password.as_deref().ok_or_else(|| {
            AppError::Core(CoreError::Validation("current_password is required".into()))
        })?;
        let valid = verify_password(current, &employee.password_hash)
            .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
        if !valid {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Current password is incorrect".into(),
            )));
        }
    }

    validate_password_strength(&input.new_password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let hashed = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    EmployeeRepo::update_password(&state.pool, id, &hashed).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build an [`EmployeeResponse`] from an employee row and a resolved role name.
pub(crate) fn build_employee_response(employee: &Employee, role: String) -> EmployeeResponse {
    EmployeeResponse {
        id: employee.id,
        employee_code: employee.employee_code.clone(),
        email: employee.email.clone(),
        first_name: employee.first_name.clone(),
        last_name: employee.last_name.clone(),
        role,
        role_id: employee.role_id,
        company_id: employee.company_id,
        sub_company_id: employee.sub_company_id,
        department_id: employee.department_id,
        position_id: employee.position_id,
        hire_date: employee.hire_date,
        retire_date: employee.retire_date,
        is_active: employee.is_active,
        is_locked: employee.is_locked,
        last_login_at: employee.last_login_at,
        created_at: employee.created_at,
    }
}

/// Fetch the role name and build the response for a single employee.
async fn employee_to_response(
    state: &AppState,
    employee: &Employee,
) -> AppResult<EmployeeResponse> {
    let role = RoleRepo::resolve_name(&state.pool, employee.role_id).await?;
    Ok(build_employee_response(employee, role))
}
