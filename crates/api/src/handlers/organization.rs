//! Handlers for the `/organization` resource: companies, sub-companies,
//! departments, and positions.
//!
//! All four levels share the same CRUD + soft-deactivate shape. Mutations
//! require the `hr` or `admin` role; reads require any authenticated
//! employee. Deactivating an already-inactive node fails with 409 instead
//! of silently succeeding.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use smarthr_core::error::CoreError;
use smarthr_core::types::DbId;
use smarthr_db::models::organization::{
    Company, CreateCompany, CreateDepartment, CreatePosition, CreateSubCompany, Department,
    Position, SubCompany, UpdateCompany, UpdateDepartment, UpdatePosition, UpdateSubCompany,
};
use smarthr_db::repositories::{
    CompanyRepo, DepartmentRepo, EmployeeRepo, PositionRepo, SubCompanyRepo,
};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireHr;
use crate::query::IncludeInactiveParams;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameter types
// ---------------------------------------------------------------------------

/// Parent filter for `GET /organization/subcompanies`.
#[derive(Debug, Deserialize)]
pub struct SubCompanyListParams {
    pub company_id: Option<DbId>,
}

/// Parent filter for `GET /organization/departments`.
#[derive(Debug, Deserialize)]
pub struct DepartmentListParams {
    pub sub_company_id: Option<DbId>,
}

/// Parent filter for `GET /organization/positions`.
#[derive(Debug, Deserialize)]
pub struct PositionListParams {
    pub department_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Companies
// ---------------------------------------------------------------------------

/// POST /api/organization/companies
pub async fn create_company(
    State(state): State<AppState>,
    RequireHr(_hr): RequireHr,
    Json(input): Json<CreateCompany>,
) -> AppResult<(StatusCode, Json<Company>)> {
    if input.code.trim().is_empty() || input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Company code and name must not be empty".into(),
        )));
    }
    let company = CompanyRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(company)))
}

/// GET /api/organization/companies
pub async fn list_companies(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(flags): Query<IncludeInactiveParams>,
) -> AppResult<Json<Vec<Company>>> {
    let companies = CompanyRepo::list(&state.pool, flags.include_inactive).await?;
    Ok(Json(companies))
}

/// GET /api/organization/companies/{id}
pub async fn get_company(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Company>> {
    let company = CompanyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Company",
            id,
        }))?;
    Ok(Json(company))
}

/// PUT /api/organization/companies/{id}
pub async fn update_company(
    State(state): State<AppState>,
    RequireHr(_hr): RequireHr,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCompany>,
) -> AppResult<Json<Company>> {
    let company = CompanyRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Company",
            id,
        }))?;
    Ok(Json(company))
}

/// DELETE /api/organization/companies/{id}
pub async fn deactivate_company(
    State(state): State<AppState>,
    RequireHr(_hr): RequireHr,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let company = CompanyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Company",
            id,
        }))?;
    if !company.is_active {
        return Err(AppError::Core(CoreError::Conflict(
            "Company is already inactive".into(),
        )));
    }
    CompanyRepo::deactivate(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Sub-companies
// ---------------------------------------------------------------------------

/// POST /api/organization/subcompanies
pub async fn create_sub_company(
    State(state): State<AppState>,
    RequireHr(_hr): RequireHr,
    Json(input): Json<CreateSubCompany>,
) -> AppResult<(StatusCode, Json<SubCompany>)> {
    let company = CompanyRepo::find_by_id(&state.pool, input.company_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Company",
            id: input.company_id,
        }))?;
    if !company.is_active {
        return Err(AppError::Core(CoreError::InvalidState(
            "Parent company is inactive".into(),
        )));
    }
    let sub_company = SubCompanyRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(sub_company)))
}

/// GET /api/organization/subcompanies
pub async fn list_sub_companies(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<SubCompanyListParams>,
    Query(flags): Query<IncludeInactiveParams>,
) -> AppResult<Json<Vec<SubCompany>>> {
    let sub_companies =
        SubCompanyRepo::list(&state.pool, params.company_id, flags.include_inactive).await?;
    Ok(Json(sub_companies))
}

/// GET /api/organization/subcompanies/{id}
pub async fn get_sub_company(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<SubCompany>> {
    let sub_company = SubCompanyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SubCompany",
            id,
        }))?;
    Ok(Json(sub_company))
}

/// PUT /api/organization/subcompanies/{id}
pub async fn update_sub_company(
    State(state): State<AppState>,
    RequireHr(_hr): RequireHr,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSubCompany>,
) -> AppResult<Json<SubCompany>> {
    let sub_company = SubCompanyRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SubCompany",
            id,
        }))?;
    Ok(Json(sub_company))
}

/// DELETE /api/organization/subcompanies/{id}
pub async fn deactivate_sub_company(
    State(state): State<AppState>,
    RequireHr(_hr): RequireHr,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let sub_company = SubCompanyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SubCompany",
            id,
        }))?;
    if !sub_company.is_active {
        return Err(AppError::Core(CoreError::Conflict(
            "Sub-company is already inactive".into(),
        )));
    }
    SubCompanyRepo::deactivate(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Departments
// ---------------------------------------------------------------------------

/// POST /api/organization/departments
pub async fn create_department(
    State(state): State<AppState>,
    RequireHr(_hr): RequireHr,
    Json(input): Json<CreateDepartment>,
) -> AppResult<(StatusCode, Json<Department>)> {
    let sub_company = SubCompanyRepo::find_by_id(&state.pool, input.sub_company_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SubCompany",
            id: input.sub_company_id,
        }))?;
    if !sub_company.is_active {
        return Err(AppError::Core(CoreError::InvalidState(
            "Parent sub-company is inactive".into(),
        )));
    }
    let department = DepartmentRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(department)))
}

/// GET /api/organization/departments
pub async fn list_departments(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<DepartmentListParams>,
    Query(flags): Query<IncludeInactiveParams>,
) -> AppResult<Json<Vec<Department>>> {
    let departments =
        DepartmentRepo::list(&state.pool, params.sub_company_id, flags.include_inactive).await?;
    Ok(Json(departments))
}

/// GET /api/organization/departments/{id}
pub async fn get_department(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Department>> {
    let department = DepartmentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Department",
            id,
        }))?;
    Ok(Json(department))
}

/// PUT /api/organization/departments/{id}
///
/// Setting `manager_id` requires the target to be an active employee of
/// this department; the manager is who `DEPT_MANAGER` approval lines
/// resolve to.
pub async fn update_department(
    State(state): State<AppState>,
    RequireHr(_hr): RequireHr,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDepartment>,
) -> AppResult<Json<Department>> {
    if let Some(manager_id) = input.manager_id {
        let manager = EmployeeRepo::find_by_id(&state.pool, manager_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Employee",
                id: manager_id,
            }))?;
        if !manager.is_active {
            return Err(AppError::Core(CoreError::InvalidState(
                "Department manager must be an active employee".into(),
            )));
        }
        if manager.department_id != id {
            return Err(AppError::Core(CoreError::Validation(
                "Department manager must belong to the department".into(),
            )));
        }
    }

    let department = DepartmentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Department",
            id,
        }))?;
    Ok(Json(department))
}

/// DELETE /api/organization/departments/{id}
pub async fn deactivate_department(
    State(state): State<AppState>,
    RequireHr(_hr): RequireHr,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let department = DepartmentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Department",
            id,
        }))?;
    if !department.is_active {
        return Err(AppError::Core(CoreError::Conflict(
            "Department is already inactive".into(),
        )));
    }
    DepartmentRepo::deactivate(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Positions
// ---------------------------------------------------------------------------

/// POST /api/organization/positions
pub async fn create_position(
    State(state): State<AppState>,
    RequireHr(_hr): RequireHr,
    Json(input): Json<CreatePosition>,
) -> AppResult<(StatusCode, Json<Position>)> {
    let department = DepartmentRepo::find_by_id(&state.pool, input.department_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Department",
            id: input.department_id,
        }))?;
    if !department.is_active {
        return Err(AppError::Core(CoreError::InvalidState(
            "Parent department is inactive".into(),
        )));
    }
    let position = PositionRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(position)))
}

/// GET /api/organization/positions
pub async fn list_positions(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<PositionListParams>,
    Query(flags): Query<IncludeInactiveParams>,
) -> AppResult<Json<Vec<Position>>> {
    let positions =
        PositionRepo::list(&state.pool, params.department_id, flags.include_inactive).await?;
    Ok(Json(positions))
}

/// GET /api/organization/positions/{id}
pub async fn get_position(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Position>> {
    let position = PositionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Position",
            id,
        }))?;
    Ok(Json(position))
}

/// PUT /api/organization/positions/{id}
pub async fn update_position(
    State(state): State<AppState>,
    RequireHr(_hr): RequireHr,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePosition>,
) -> AppResult<Json<Position>> {
    let position = PositionRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Position",
            id,
        }))?;
    Ok(Json(position))
}

/// DELETE /api/organization/positions/{id}
pub async fn deactivate_position(
    State(state): State<AppState>,
    RequireHr(_hr): RequireHr,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let position = PositionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Position",
            id,
        }))?;
    if !position.is_active {
        return Err(AppError::Core(CoreError::Conflict(
            "Position is already inactive".into(),
        )));
    }
    PositionRepo::deactivate(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Shared validation
// ---------------------------------------------------------------------------

/// Validate a full organizational tuple: every node must exist, be active,
/// and belong to its parent (sub-company under company, department under
/// sub-company, position under department).
///
/// Used by employee creation and the assignment/transfer flow.
pub(crate) async fn ensure_org_tuple_valid(
    pool: &PgPool,
    company_id: DbId,
    sub_company_id: DbId,
    department_id: DbId,
    position_id: DbId,
) -> AppResult<()> {
    let company = CompanyRepo::find_by_id(pool, company_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Company",
            id: company_id,
        }))?;
    if !company.is_active {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Company {company_id} is inactive"
        ))));
    }

    let sub_company = SubCompanyRepo::find_by_id(pool, sub_company_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SubCompany",
            id: sub_company_id,
        }))?;
    if !sub_company.is_active {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Sub-company {sub_company_id} is inactive"
        ))));
    }
    if sub_company.company_id != company_id {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Sub-company {sub_company_id} does not belong to company {company_id}"
        ))));
    }

    let department = DepartmentRepo::find_by_id(pool, department_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Department",
            id: department_id,
        }))?;
    if !department.is_active {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Department {department_id} is inactive"
        ))));
    }
    if department.sub_company_id != sub_company_id {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Department {department_id} does not belong to sub-company {sub_company_id}"
        ))));
    }

    let position = PositionRepo::find_by_id(pool, position_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Position",
            id: position_id,
        }))?;
    if !position.is_active {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Position {position_id} is inactive"
        ))));
    }
    if position.department_id != department_id {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Position {position_id} does not belong to department {department_id}"
        ))));
    }

    Ok(())
}
