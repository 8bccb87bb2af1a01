//! Well-known role name constants and approval-line role tokens.
//!
//! Role names must match the seed data in
//! `20260801000001_create_roles_table.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_HR: &str = "hr";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_EMPLOYEE: &str = "employee";

/// Approval-line template token: the requester's department manager.
pub const APPROVER_DEPT_MANAGER: &str = "DEPT_MANAGER";

/// Approval-line template token: an active member of the HR team.
pub const APPROVER_HR_TEAM: &str = "HR_TEAM";

/// Approval-line template token: the manager of the HR team's department.
pub const APPROVER_HR_MANAGER: &str = "HR_MANAGER";

/// All tokens a form's `auto_approval_line` template may use.
pub const VALID_APPROVER_TOKENS: &[&str] =
    &[APPROVER_DEPT_MANAGER, APPROVER_HR_TEAM, APPROVER_HR_MANAGER];
