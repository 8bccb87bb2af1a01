//! Employee field validation helpers.

use validator::ValidateEmail;

/// Maximum length of an employee code.
const MAX_EMPLOYEE_CODE_LEN: usize = 20;

/// Validate an email address format.
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.validate_email() {
        Ok(())
    } else {
        Err(format!("Invalid email address: '{email}'"))
    }
}

/// Validate an employee code: non-empty, at most 20 chars, ASCII
/// alphanumeric plus `-`.
pub fn validate_employee_code(code: &str) -> Result<(), String> {
    if code.is_empty() {
        return Err("Employee code must not be empty".to_string());
    }
    if code.len() > MAX_EMPLOYEE_CODE_LEN {
        return Err(format!(
            "Employee code must be at most {MAX_EMPLOYEE_CODE_LEN} characters"
        ));
    }
    if !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(format!(
            "Employee code '{code}' may only contain letters, digits, and '-'"
        ));
    }
    Ok(())
}

/// Validate a person-name field: non-empty after trimming.
pub fn validate_name(name: &str, field: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err(format!("{field} must not be empty"));
    }
    Ok(())
}
