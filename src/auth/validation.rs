//! Username validation for Yatube accounts.

use thiserror::Error;

/// Maximum username length (in characters).
pub const MAX_USERNAME_LENGTH: usize = 150;

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Username is empty.
    #[error("username cannot be empty")]
    UsernameEmpty,

    /// Username is too long.
    #[error("username must be at most {MAX_USERNAME_LENGTH} characters")]
    UsernameTooLong,

    /// Username contains invalid characters.
    #[error("username may contain only letters, digits and @/./+/-/_ characters")]
    UsernameInvalidChars,
}

/// Validate a username.
///
/// Requirements:
/// - Length: 1-150 characters
/// - Characters: letters, digits and `@`, `.`, `+`, `-`, `_`
///
/// Usernames appear verbatim in profile URLs, so `/` and whitespace are
/// rejected.
///
/// # Examples
///
/// ```
/// use yatube::auth::validation::validate_username;
///
/// assert!(validate_username("leo.tolstoy").is_ok());
/// assert!(validate_username("").is_err());
/// assert!(validate_username("with space").is_err());
/// ```
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(ValidationError::UsernameEmpty);
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::UsernameTooLong);
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(ValidationError::UsernameInvalidChars);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_usernames() {
        assert!(validate_username("leo").is_ok());
        assert!(validate_username("leo_tolstoy").is_ok());
        assert!(validate_username("user@example.com").is_ok());
        assert!(validate_username("a+b-c").is_ok());
        assert!(validate_username("лев").is_ok());
        assert!(validate_username(&"a".repeat(MAX_USERNAME_LENGTH)).is_ok());
    }

    #[test]
    fn test_invalid_usernames() {
        assert_eq!(validate_username(""), Err(ValidationError::UsernameEmpty));
        assert_eq!(
            validate_username(&"a".repeat(MAX_USERNAME_LENGTH + 1)),
            Err(ValidationError::UsernameTooLong)
        );
        assert_eq!(
            validate_username("with space"),
            Err(ValidationError::UsernameInvalidChars)
        );
        assert_eq!(
            validate_username("slash/name"),
            Err(ValidationError::UsernameInvalidChars)
        );
        assert_eq!(
            validate_username("quote'name"),
            Err(ValidationError::UsernameInvalidChars)
        );
    }
}
