//! SmartHR domain core.
//!
//! Pure domain logic shared by the database and API layers: typed errors,
//! status constants and the approval state machine, document numbering,
//! assignment classification, and validation helpers. No I/O happens here.

pub mod approval;
pub mod assignment;
pub mod document_number;
pub mod employee;
pub mod error;
pub mod lockout;
pub mod roles;
pub mod types;
