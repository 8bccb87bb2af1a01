//! Employee refresh-token session model and DTOs.

use smarthr_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A session row from the `employee_sessions` table.
#[derive(Debug, Clone, FromRow)]
pub struct EmployeeSession {
    pub id: DbId,
    pub employee_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub is_revoked: bool,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new session.
pub struct CreateSession {
    pub employee_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}
