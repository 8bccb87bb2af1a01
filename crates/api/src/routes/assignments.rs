//! Route definitions for the `/assignments` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::assignments;
use crate::state::AppState;

/// Routes mounted at `/assignments`.
///
/// ```text
/// POST /{employee_id}/transfer   transfer_employee (HR/admin)
/// GET  /{employee_id}/history    get_assignment_history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{employee_id}/transfer",
            post(assignments::transfer_employee),
        )
        .route(
            "/{employee_id}/history",
            get(assignments::get_assignment_history),
        )
}
