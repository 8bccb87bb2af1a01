//! Route definitions for the `/organization` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::organization;
use crate::state::AppState;

/// Routes mounted at `/organization`.
///
/// Each hierarchy level gets the same CRUD surface:
///
/// ```text
/// GET    /companies            list    POST   /companies          create
/// GET    /companies/{id}       get     PUT    /companies/{id}     update
/// DELETE /companies/{id}       deactivate
/// ... and likewise for /subcompanies, /departments, /positions
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/companies",
            get(organization::list_companies).post(organization::create_company),
        )
        .route(
            "/companies/{id}",
            get(organization::get_company)
                .put(organization::update_company)
                .delete(organization::deactivate_company),
        )
        .route(
            "/subcompanies",
            get(organization::list_sub_companies).post(organization::create_sub_company),
        )
        .route(
            "/subcompanies/{id}",
            get(organization::get_sub_company)
                .put(organization::update_sub_company)
                .delete(organization::deactivate_sub_company),
        )
        .route(
            "/departments",
            get(organization::list_departments).post(organization::create_department),
        )
        .route(
            "/departments/{id}",
            get(organization::get_department)
                .put(organization::update_department)
                .delete(organization::deactivate_department),
        )
        .route(
            "/positions",
            get(organization::list_positions).post(organization::create_position),
        )
        .route(
            "/positions/{id}",
            get(organization::get_position)
                .put(organization::update_position)
                .delete(organization::deactivate_position),
        )
}
