//! Approval document status constants, action validation, and the
//! sequential state machine.
//!
//! A document moves `PENDING -> IN_PROGRESS -> APPROVED` as each level of
//! its approval line approves in order, or terminates at `REJECTED` the
//! moment any level rejects. Level `n + 1` can never be acted on before
//! level `n` is resolved.

use crate::roles::VALID_APPROVER_TOKENS;

/// Document is created but its approval line is not yet in effect.
pub const DOC_STATUS_DRAFT: &str = "DRAFT";

/// Document is waiting on the first approval level.
pub const DOC_STATUS_PENDING: &str = "PENDING";

/// At least one level approved; more levels remain.
pub const DOC_STATUS_IN_PROGRESS: &str = "IN_PROGRESS";

/// Every level approved. Terminal.
pub const DOC_STATUS_APPROVED: &str = "APPROVED";

/// Some level rejected. Terminal.
pub const DOC_STATUS_REJECTED: &str = "REJECTED";

pub const LINE_STATUS_PENDING: &str = "PENDING";
pub const LINE_STATUS_APPROVED: &str = "APPROVED";
pub const LINE_STATUS_REJECTED: &str = "REJECTED";

/// History action recorded when a document is created.
pub const ACTION_DRAFT: &str = "DRAFT";
pub const ACTION_APPROVE: &str = "APPROVE";
pub const ACTION_REJECT: &str = "REJECT";

/// Actions a caller may submit to the processing endpoint.
pub const VALID_ACTIONS: &[&str] = &[ACTION_APPROVE, ACTION_REJECT];

/// Validate that an action string is one of the accepted processing actions.
pub fn validate_action(action: &str) -> Result<(), String> {
    if VALID_ACTIONS.contains(&action) {
        Ok(())
    } else {
        Err(format!(
            "Invalid action '{action}'. Must be one of: {}",
            VALID_ACTIONS.join(", ")
        ))
    }
}

/// Whether a document in this status can still be acted on.
pub fn is_actionable(status: &str) -> bool {
    status == DOC_STATUS_PENDING || status == DOC_STATUS_IN_PROGRESS
}

/// Whether this status is terminal (no further transitions).
pub fn is_terminal(status: &str) -> bool {
    status == DOC_STATUS_APPROVED || status == DOC_STATUS_REJECTED
}

/// Outcome of applying one approval action to a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTransition {
    /// New document status.
    pub document_status: &'static str,
    /// New `current_level` (number of resolved levels).
    pub current_level: i32,
    /// Status to record on the acted-upon line.
    pub line_status: &'static str,
    /// Whether the document reached a terminal status.
    pub terminal: bool,
}

/// Compute the document transition for one action at the next pending level.
///
/// `current_level` counts resolved levels (0-based), so the acted-upon line
/// is the one at `current_level + 1`. The caller is responsible for checking
/// that the acting user owns that line; this function only encodes the state
/// machine itself.
pub fn next_document_state(
    status: &str,
    current_level: i32,
    total_level: i32,
    action: &str,
) -> Result<DocumentTransition, String> {
    if !is_actionable(status) {
        return Err(format!("Document in status '{status}' cannot be processed"));
    }
    if current_level < 0 || current_level >= total_level {
        return Err(format!(
            "Approval level out of range: {current_level} of {total_level}"
        ));
    }

    match action {
        ACTION_REJECT => Ok(DocumentTransition {
            document_status: DOC_STATUS_REJECTED,
            current_level,
            line_status: LINE_STATUS_REJECTED,
            terminal: true,
        }),
        ACTION_APPROVE => {
            let resolved = current_level + 1;
            if resolved == total_level {
                Ok(DocumentTransition {
                    document_status: DOC_STATUS_APPROVED,
                    current_level: resolved,
                    line_status: LINE_STATUS_APPROVED,
                    terminal: true,
                })
            } else {
                Ok(DocumentTransition {
                    document_status: DOC_STATUS_IN_PROGRESS,
                    current_level: resolved,
                    line_status: LINE_STATUS_APPROVED,
                    terminal: false,
                })
            }
        }
        other => Err(format!("Invalid action '{other}'")),
    }
}

/// Parse a form's `auto_approval_line` template into ordered role tokens.
///
/// The template is a comma-separated token list (e.g.
/// `DEPT_MANAGER,HR_TEAM,HR_MANAGER`); one token per approval level.
pub fn parse_approval_line_template(template: &str) -> Result<Vec<String>, String> {
    let tokens: Vec<String> = template
        .split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.is_empty() {
        return Err("Approval line template is empty".to_string());
    }

    for token in &tokens {
        if !VALID_APPROVER_TOKENS.contains(&token.as_str()) {
            return Err(format!(
                "Unknown approver token '{token}'. Must be one of: {}",
                VALID_APPROVER_TOKENS.join(", ")
            ));
        }
    }

    Ok(tokens)
}

/// Check that every field named by a form's `required_fields` array is
/// present and non-null in a document's content object.
pub fn validate_required_fields(
    content: &serde_json::Value,
    required_fields: &serde_json::Value,
) -> Result<(), String> {
    let required = match required_fields.as_array() {
        Some(required) => required,
        // A form with no required-field list accepts any content.
        None => return Ok(()),
    };

    let object = content
        .as_object()
        .ok_or_else(|| "Document content must be a JSON object".to_string())?;

    for field in required {
        let name = field
            .as_str()
            .ok_or_else(|| format!("Malformed required-field entry: {field}"))?;
        match object.get(name) {
            Some(value) if !value.is_null() => {}
            _ => return Err(format!("Missing required field '{name}'")),
        }
    }

    Ok(())
}
