//! Approval document number formatting.
//!
//! Numbers look like `VACATION-202608-0042`: form code, creation year-month,
//! and a four-digit counter scoped to that (code, month) pair. The counter
//! itself is allocated by the repository inside the creation transaction;
//! this module only owns the textual format.

use crate::types::Timestamp;

/// The shared prefix of every document created for `form_code` in the month
/// of `at` (e.g. `VACATION-202608-`). Used both for formatting and for
/// counting existing documents in the scope.
pub fn month_prefix(form_code: &str, at: Timestamp) -> String {
    format!("{}-{}-", form_code, at.format("%Y%m"))
}

/// Format a full document number from its scope prefix and sequence value.
pub fn format_document_number(form_code: &str, at: Timestamp, seq: i64) -> String {
    format!("{}{:04}", month_prefix(form_code, at), seq)
}
