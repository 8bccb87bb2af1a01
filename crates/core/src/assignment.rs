//! Assignment classification policy.
//!
//! A transfer changes some subset of an employee's four organizational
//! coordinates (company, sub-company, department, position). The subset
//! determines the category recorded in the assignment history. The mapping
//! is a policy value rather than scattered literals so deployments can
//! swap it without touching the transfer flow.

pub const ASSIGN_COMPANY_TRANSFER: &str = "COMPANY_TRANSFER";
pub const ASSIGN_SUB_COMPANY_TRANSFER: &str = "SUB_COMPANY_TRANSFER";
pub const ASSIGN_DEPARTMENT_TRANSFER: &str = "DEPARTMENT_TRANSFER";
pub const ASSIGN_POSITION_CHANGE: &str = "POSITION_CHANGE";

/// Catch-all category for broad reorganizations (three or more coordinates,
/// or any pair without a dedicated name).
pub const ASSIGN_COMPREHENSIVE: &str = "COMPREHENSIVE";

/// Which of the four coordinates differ between the current and target tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinateDiff {
    pub company: bool,
    pub sub_company: bool,
    pub department: bool,
    pub position: bool,
}

impl CoordinateDiff {
    pub fn changed_count(&self) -> usize {
        [self.company, self.sub_company, self.department, self.position]
            .iter()
            .filter(|c| **c)
            .count()
    }
}

/// Maps a coordinate diff to an assignment category.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssignmentPolicy;

impl AssignmentPolicy {
    /// Classify a transfer by the coordinates it changes.
    ///
    /// A diff with no changes is an error: a no-op transfer must be rejected,
    /// never silently recorded.
    pub fn classify(&self, diff: CoordinateDiff) -> Result<&'static str, String> {
        let category = match (diff.company, diff.sub_company, diff.department, diff.position) {
            (false, false, false, false) => {
                return Err(
                    "Transfer target is identical to the employee's current assignment"
                        .to_string(),
                )
            }
            (true, false, false, false) => ASSIGN_COMPANY_TRANSFER,
            (false, true, false, false) => ASSIGN_SUB_COMPANY_TRANSFER,
            (false, false, true, false) => ASSIGN_DEPARTMENT_TRANSFER,
            (false, false, false, true) => ASSIGN_POSITION_CHANGE,
            // Moving company almost always moves the sub-company with it;
            // the pair keeps the company-transfer name.
            (true, true, false, false) => ASSIGN_COMPANY_TRANSFER,
            // A department move that also changes position is still a
            // department transfer.
            (false, false, true, true) => ASSIGN_DEPARTMENT_TRANSFER,
            _ => ASSIGN_COMPREHENSIVE,
        };
        Ok(category)
    }
}
