use crate::types::DbId;

/// Typed domain error returned by business operations.
///
/// Replaces the legacy `ResultCode`/`Message` output-parameter contract with
/// distinct kinds that the HTTP layer maps to status codes in one place.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// The entity exists but its current state forbids the operation
    /// (e.g. processing a terminal approval document).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
