//! Route definitions for the `/employees` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::employees;
use crate::state::AppState;

/// Routes mounted at `/employees`.
///
/// ```text
/// GET    /                       list_employees
/// POST   /                       create_employee (HR/admin)
/// GET    /{id}                   get_employee
/// PUT    /{id}                   update_employee (HR/admin)
/// DELETE /{id}                   delete_employee (HR/admin, soft)
/// POST   /{id}/change-password   change_password
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(employees::list_employees).post(employees::create_employee),
        )
        .route(
            "/{id}",
            get(employees::get_employee)
                .put(employees::update_employee)
                .delete(employees::delete_employee),
        )
        .route("/{id}/change-password", post(employees::change_password))
}
