//! Request handlers.
//!
//! Each submodule provides async handler functions for a single resource.
//! Handlers validate input, delegate to the corresponding repository in
//! `smarthr_db`, and map errors via [`crate::error::AppError`].

pub mod approval;
pub mod assignments;
pub mod auth;
pub mod employees;
pub mod organization;
pub mod vacation;
