//! Input validation helpers
//!
//! Centralized limits and format checks for the auth and order endpoints.

use validator::ValidateEmail;

use crate::utils::AppError;

// ── Limits ──────────────────────────────────────────────────────────

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Minimum password length before hashing
pub const MIN_PASSWORD_LEN: usize = 8;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Display names
pub const MAX_NAME_LEN: usize = 200;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate email shape and length.
pub fn validate_email(email: &str) -> Result<(), AppError> {
    if email.len() > MAX_EMAIL_LEN || !email.validate_email() {
        return Err(AppError::validation("Please enter a valid email"));
    }
    Ok(())
}

/// Validate password strength (length bounds only).
pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::validation("Please enter a strong password"));
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "Password is too long (max {MAX_PASSWORD_LEN} chars)"
        )));
    }
    Ok(())
}

/// M-Pesa subscriber numbers: 2547XXXXXXXX, 12 digits total.
pub fn is_valid_mpesa_phone(phone: &str) -> bool {
    phone.len() == 12 && phone.starts_with("2547") && phone.bytes().all(|b| b.is_ascii_digit())
}

/// Validate the delivery phone for a mobile-money order.
pub fn validate_mpesa_phone(phone: &str) -> Result<(), AppError> {
    if !is_valid_mpesa_phone(phone) {
        return Err(AppError::validation(
            "Phone number must be in the format 2547XXXXXXXX",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mpesa_phone_format() {
        assert!(is_valid_mpesa_phone("254712345678"));
        assert!(!is_valid_mpesa_phone("254812345678")); // not a 7xx prefix
        assert!(!is_valid_mpesa_phone("25471234567")); // too short
        assert!(!is_valid_mpesa_phone("2547123456789")); // too long
        assert!(!is_valid_mpesa_phone("2547abcd5678"));
        assert!(!is_valid_mpesa_phone("0712345678"));
    }

    #[test]
    fn email_validation() {
        assert!(validate_email("a@x.com").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn password_bounds() {
        assert!(validate_password("password1").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"x".repeat(200)).is_err());
    }
}
