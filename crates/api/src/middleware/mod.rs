//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated employee from a JWT
//!   Bearer token.
//! - [`rbac::RequireHr`] -- Requires `hr` or `admin` role.

pub mod auth;
pub mod rbac;
