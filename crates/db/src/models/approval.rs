//! Approval workflow models: form catalog, documents, per-level lines,
//! and the append-only history trail.

use serde::{Deserialize, Serialize};
use smarthr_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `approval_forms` table.
///
/// Forms are created by administrators and read-only afterwards apart from
/// deactivation.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ApprovalForm {
    pub id: DbId,
    pub form_code: String,
    pub form_name: String,
    /// JSON field schema describing the document content.
    pub field_schema: serde_json::Value,
    /// JSON array of field names that must be present in the content.
    pub required_fields: serde_json::Value,
    /// Comma-separated approver role tokens, one per level.
    pub auto_approval_line: String,
    pub max_approval_level: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `approval_documents` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ApprovalDocument {
    pub id: DbId,
    pub document_number: String,
    pub form_id: DbId,
    pub title: String,
    pub content: serde_json::Value,
    pub requester_id: DbId,
    pub status: String,
    /// Number of resolved approval levels (0-based).
    pub current_level: i32,
    pub total_level: i32,
    /// Stamped when the document reaches a terminal status.
    pub processed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `approval_lines` table: one expected approver per level.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ApprovalLine {
    pub id: DbId,
    pub document_id: DbId,
    pub level: i32,
    pub approver_id: DbId,
    pub status: String,
    pub comment: Option<String>,
    pub processed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the append-only `approval_history` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ApprovalHistoryEntry {
    pub id: DbId,
    pub document_id: DbId,
    pub actor_id: DbId,
    pub action_type: String,
    pub comment: Option<String>,
    pub resulting_status: String,
    pub created_at: Timestamp,
}

/// DTO for creating a new approval document.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDocument {
    pub form_id: DbId,
    pub title: String,
    pub content: serde_json::Value,
    pub requester_id: DbId,
}

/// A document together with its ordered lines and history.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentDetail {
    pub document: ApprovalDocument,
    pub lines: Vec<ApprovalLine>,
    pub history: Vec<ApprovalHistoryEntry>,
}
