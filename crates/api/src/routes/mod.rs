//! Route definitions.
//!
//! Each submodule exposes a `router()` building the routes of one resource;
//! [`api_routes`] composes them into the `/api` tree.

pub mod approval;
pub mod assignments;
pub mod auth;
pub mod employees;
pub mod health;
pub mod organization;
pub mod vacation;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                  login (public)
/// /auth/refresh                                refresh (public)
/// /auth/logout                                 logout (requires auth)
/// /auth/me                                     current employee profile
///
/// /employees                                   list, create
/// /employees/{id}                              get, update, soft delete
/// /employees/{id}/change-password              change password (POST)
///
/// /organization/companies                      list, create
/// /organization/companies/{id}                 get, update, deactivate
/// /organization/subcompanies                   list, create
/// /organization/subcompanies/{id}              get, update, deactivate
/// /organization/departments                    list, create
/// /organization/departments/{id}               get, update, deactivate
/// /organization/positions                      list, create
/// /organization/positions/{id}                 get, update, deactivate
///
/// /assignments/{employee_id}/transfer          transfer employee (POST)
/// /assignments/{employee_id}/history           assignment history (GET)
///
/// /approval/forms                              active form catalog (GET)
/// /approval/documents                          create document (POST)
/// /approval/documents/{id}                     document detail (GET)
/// /approval/documents/{id}/process             approve/reject (POST)
/// /approval/pending                            documents awaiting caller (GET)
/// /approval/my-documents                       caller's documents (GET)
///
/// /vacation/request                            create vacation request (POST)
/// /vacation/my-requests                        caller's vacation docs (GET)
/// /vacation/team-status                        department vacation view (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/employees", employees::router())
        .nest("/organization", organization::router())
        .nest("/assignments", assignments::router())
        .nest("/approval", approval::router())
        .nest("/vacation", vacation::router())
}
