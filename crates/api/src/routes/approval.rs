//! Route definitions for the approval workflow.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::approval;
use crate::state::AppState;

/// Routes mounted at `/approval`.
///
/// ```text
/// GET  /forms                     list_forms
/// POST /documents                 create_document
/// GET  /documents/{id}            get_document
/// POST /documents/{id}/process    process_document
/// GET  /pending                   list_pending
/// GET  /my-documents              list_my_documents
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/forms", get(approval::list_forms))
        .route("/documents", post(approval::create_document))
        .route("/documents/{id}", get(approval::get_document))
        .route("/documents/{id}/process", post(approval::process_document))
        .route("/pending", get(approval::list_pending))
        .route("/my-documents", get(approval::list_my_documents))
}
