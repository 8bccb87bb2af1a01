//! Route definitions for the `/vacation` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::vacation;
use crate::state::AppState;

/// Routes mounted at `/vacation`.
///
/// ```text
/// POST /request       request_vacation
/// GET  /my-requests   list_my_requests
/// GET  /team-status   team_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/request", post(vacation::request_vacation))
        .route("/my-requests", get(vacation::list_my_requests))
        .route("/team-status", get(vacation::team_status))
}
