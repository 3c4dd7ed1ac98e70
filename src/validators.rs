/// Credential field validators
///
/// Shape checks run on sign-in payloads before any backend logic:
/// 1. Length limits (DoS protection)
/// 2. Email format (RFC 5322 simplified)
/// 3. Username character set
/// 4. Control characters and null bytes

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ValidationError;

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321
const MIN_EMAIL_LENGTH: usize = 5;
const MAX_USERNAME_LENGTH: usize = 150;
// bcrypt only reads the first 72 bytes, anything far beyond is abuse

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).unwrap();

    static ref USERNAME_REGEX: Regex = Regex::new(r"^[\w.@+-]+$").unwrap();
}

/// Validates an email address and returns it trimmed
pub fn is_valid_email(email: &str) -> Result<String, ValidationError> {
    let trimmed = email.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("email".to_string()));
    }

    if trimmed.len() < MIN_EMAIL_LENGTH {
        return Err(ValidationError::TooShort("email".to_string(), MIN_EMAIL_LENGTH));
    }

    if trimmed.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong("email".to_string(), MAX_EMAIL_LENGTH));
    }

    if !EMAIL_REGEX.is_match(trimmed) {
        return Err(ValidationError::InvalidFormat("email".to_string()));
    }

    if has_suspicious_email_patterns(trimmed) {
        return Err(ValidationError::SuspiciousContent("email".to_string()));
    }

    Ok(trimmed.to_string())
}

/// Validates a username and returns it trimmed
///
/// Letters, digits and `@ . + - _` are accepted.
pub fn is_valid_username(username: &str) -> Result<String, ValidationError> {
    let trimmed = username.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("username".to_string()));
    }

    if trimmed.len() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::TooLong(
            "username".to_string(),
            MAX_USERNAME_LENGTH,
        ));
    }

    if !USERNAME_REGEX.is_match(trimmed) {
        return Err(ValidationError::InvalidFormat("username".to_string()));
    }

    Ok(trimmed.to_string())
}

/// Validates the shape of a submitted password
///
/// Any string is a candidate password at sign-in; a wrong one is a 401,
/// not a 422. Only NUL bytes are refused since bcrypt cannot hash them.
pub fn is_valid_password(password: &str) -> Result<(), ValidationError> {
    if password.contains('\0') {
        return Err(ValidationError::SuspiciousContent("password".to_string()));
    }

    Ok(())
}

/// Detects suspicious patterns in email addresses that might indicate phishing
fn has_suspicious_email_patterns(email: &str) -> bool {
    // Local part longer than RFC 5321 allows
    if let Some(at_pos) = email.find('@') {
        let local_part = &email[..at_pos];
        if local_part.len() > 64 {
            return true;
        }
    }

    if email.matches('@').count() != 1 {
        return true;
    }

    if email.contains('\0') {
        return true;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(is_valid_email("foo@bar.com").is_ok());
        assert!(is_valid_email("test.email@domain.co.uk").is_ok());
        assert!(is_valid_email("user+tag@example.com").is_ok());
    }

    #[test]
    fn test_email_is_trimmed() {
        assert_eq!(is_valid_email("  foo@bar.com ").unwrap(), "foo@bar.com");
    }

    #[test]
    fn test_invalid_email_format() {
        assert!(is_valid_email("invalid").is_err());
        assert!(is_valid_email("user@").is_err());
        assert!(is_valid_email("@example.com").is_err());
        assert!(is_valid_email("user@@example.com").is_err());
    }

    #[test]
    fn test_email_length_limits() {
        let too_long = format!("{}@example.com", "a".repeat(250));
        assert!(is_valid_email(&too_long).is_err());
        assert_eq!(
            is_valid_email("a@b"),
            Err(ValidationError::TooShort("email".to_string(), MIN_EMAIL_LENGTH))
        );
    }

    #[test]
    fn test_empty_email() {
        assert_eq!(
            is_valid_email("   "),
            Err(ValidationError::EmptyField("email".to_string()))
        );
    }

    #[test]
    fn test_valid_username() {
        assert!(is_valid_username("test").is_ok());
        assert!(is_valid_username("john.doe_92").is_ok());
        assert!(is_valid_username("ops+bot@team").is_ok());
    }

    #[test]
    fn test_invalid_username() {
        assert!(is_valid_username("").is_err());
        assert!(is_valid_username("john doe").is_err());
        assert!(is_valid_username("name\0null").is_err());
        assert!(is_valid_username(&"a".repeat(MAX_USERNAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_password_shape() {
        assert!(is_valid_password("12345").is_ok());
        assert!(is_valid_password("").is_ok());
        assert!(is_valid_password(&"a".repeat(500)).is_ok());
        assert!(is_valid_password("abc\0def").is_err());
    }
}
