//! Vacation read-models projected from approval documents.

use serde::Serialize;
use smarthr_core::types::DbId;
use sqlx::FromRow;

/// One colleague's vacation document, as shown in the team-status view.
///
/// Dates come out of the document's JSON content, so they surface as the
/// strings the requester submitted.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TeamVacationEntry {
    pub employee_id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub document_id: DbId,
    pub document_number: String,
    pub title: String,
    pub status: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub vacation_type: Option<String>,
}
