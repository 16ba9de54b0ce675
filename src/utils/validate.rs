//! Custom field validators used by request DTOs through `validator`.

use std::borrow::Cow;

use validator::ValidationError;

/// Usernames are 3 to 50 characters of ASCII letters, digits and underscores.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let len = username.chars().count();
    if !(3..=50).contains(&len) {
        return Err(error(
            "username_length",
            "Username must be between 3 and 50 characters",
        ));
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(error(
            "username_charset",
            "Username can only contain letters, numbers, and underscores",
        ));
    }

    Ok(())
}

/// Rejects values that are empty after trimming whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("blank", "Value must not be blank"));
    }
    Ok(())
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}
