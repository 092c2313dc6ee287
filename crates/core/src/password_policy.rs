//! Password strength policy shared by signup, change-password, and reset.
//!
//! The rules mirror the signup form: 8-100 characters with at least one
//! lowercase letter, one uppercase letter, and one digit.

/// Minimum password length in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Maximum password length in characters.
pub const MAX_PASSWORD_LEN: usize = 100;

/// Validate that a password meets the account password policy.
///
/// Returns `Ok(())` when the password is acceptable, or `Err` with a
/// human-readable explanation suitable for showing to the user.
pub fn validate_password_strength(password: &str) -> Result<(), String> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        ));
    }
    if len > MAX_PASSWORD_LEN {
        return Err(format!(
            "Password must be less than {MAX_PASSWORD_LEN} characters"
        ));
    }

    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !(has_lower && has_upper && has_digit) {
        return Err(
            "Password must contain at least one uppercase letter, one lowercase letter, \
             and one number"
                .to_string(),
        );
    }

    Ok(())
}
