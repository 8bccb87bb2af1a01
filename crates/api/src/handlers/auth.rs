//! Handlers for the `/auth` resource (login, refresh, logout, me).
//!
//! Login owns the whole lockout sequence: account gates run before the
//! password is ever compared, and the failed-attempt counter is incremented
//! here, not in some unseen caller.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use smarthr_core::error::CoreError;
use smarthr_core::types::DbId;
use smarthr_db::models::employee::Employee;
use smarthr_db::models::session::CreateSession;
use smarthr_db::repositories::{EmployeeRepo, RoleRepo, SessionRepo};

use crate::auth::jwt::{
    generate_access_token, generate_refresh_token, hash_refresh_token, TokenSubject,
};
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::handlers::employees::build_employee_response;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Successful authentication response returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub employee: EmployeeInfo,
}

/// Public employee info embedded in [`AuthResponse`].
#[derive(Debug, Serialize)]
pub struct EmployeeInfo {
    pub id: DbId,
    pub employee_code: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub department_id: DbId,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/login
///
/// Authenticate with email + password. Returns access and refresh tokens.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    // 1. Find employee by email.
    let employee = EmployeeRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
        })?;

    // 2. A locked account fails before any password comparison.
    if employee.is_locked {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is locked. Contact an administrator.".into(),
        )));
    }

    // 3. Retired/deactivated accounts cannot log in.
    if !employee.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    // 4. An account already at the failure threshold locks now, still
    //    before the hash comparison.
    if state.config.lockout.should_lock(employee.failed_login_count) {
        EmployeeRepo::lock_account(&state.pool, employee.id).await?;
        tracing::warn!(employee_id = employee.id, "Account locked at login gate");
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is locked. Contact an administrator.".into(),
        )));
    }

    // 5. Verify password.
    let password_valid = verify_password(&input.password, &employee.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        // 6. On failure: increment counter, lock if the threshold is reached.
        let new_count = EmployeeRepo::increment_failed_login(&state.pool, employee.id).await?;
        if state.config.lockout.should_lock(new_count) {
            EmployeeRepo::lock_account(&state.pool, employee.id).await?;
            tracing::warn!(
                employee_id = employee.id,
                failed_count = new_count,
                "Account locked after repeated login failures"
            );
        }
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid email or password".into(),
        )));
    }

    // 7. On success: reset failed count, stamp last_login_at.
    EmployeeRepo::record_successful_login(&state.pool, employee.id).await?;

    // 8. Resolve role name for JWT claims, generate tokens, create session.
    let role_name = RoleRepo::resolve_name(&state.pool, employee.role_id).await?;
    let response = create_auth_response(&state, &employee, &role_name).await?;

    Ok(Json(response))
}

/// POST /api/auth/refresh
///
/// Exchange a valid refresh token for new access + refresh tokens.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    // 1. Hash the provided refresh token.
    let token_hash = hash_refresh_token(&input.refresh_token);

    // 2. Find matching live session.
    let session = SessionRepo::find_by_refresh_token_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    // 3. Revoke old session (token rotation).
    SessionRepo::revoke(&state.pool, session.id).await?;

    // 4. Find employee and re-check account gates.
    let employee = EmployeeRepo::find_by_id(&state.pool, session.employee_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Employee no longer exists".into()))
        })?;

    if employee.is_locked {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is locked. Contact an administrator.".into(),
        )));
    }
    if !employee.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let role_name = RoleRepo::resolve_name(&state.pool, employee.role_id).await?;

    // 5. Generate new tokens and create a new session.
    let response = create_auth_response(&state, &employee, &role_name).await?;

    Ok(Json(response))
}

/// POST /api/auth/logout
///
/// Revoke all sessions for the authenticated employee. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> AppResult<StatusCode> {
    SessionRepo::revoke_all_for_employee(&state.pool, auth.employee_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/auth/me
///
/// Return the authenticated employee's profile.
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<smarthr_db::models::employee::EmployeeResponse>> {
    let employee = EmployeeRepo::find_by_id(&state.pool, auth.employee_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Employee",
            id: auth.employee_id,
        }))?;

    let role_name = RoleRepo::resolve_name(&state.pool, employee.role_id).await?;
    Ok(Json(build_employee_response(&employee, role_name)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate access + refresh tokens, persist a session row, and build the
/// response.
async fn create_auth_response(
    state: &AppState,
    employee: &Employee,
    role: &str,
) -> AppResult<AuthResponse> {
    let subject = TokenSubject {
        employee_id: employee.id,
        employee_code: &employee.employee_code,
        email: &employee.email,
        role,
        department_id: employee.department_id,
        first_name: &employee.first_name,
        last_name: &employee.last_name,
    };
    let access_token = generate_access_token(&subject, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_plaintext, refresh_hash) = generate_refresh_token();

    let expires_at = Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);

    let session_input = CreateSession {
        employee_id: employee.id,
        refresh_token_hash: refresh_hash,
        expires_at,
        user_agent: None,
        ip_address: None,
    };
    SessionRepo::create(&state.pool, &session_input).await?;

    let expires_in = state.config.jwt.access_token_expiry_hours * 3600;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        expires_in,
        employee: EmployeeInfo {
            id: employee.id,
            employee_code: employee.employee_code.clone(),
            email: employee.email.clone(),
            first_name: employee.first_name.clone(),
            last_name: employee.last_name.clone(),
            role: role.to_string(),
            department_id: employee.department_id,
        },
    })
}
