//! User domain types and account field rules.

use serde::{Deserialize, Serialize};

pub const EMAIL_MAX_LEN: usize = 254;
pub const USERNAME_MAX_LEN: usize = 150;
pub const PERSON_NAME_MAX_LEN: usize = 150;
pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 150;

/// User permission level.
///
/// Storage format: `i16` (0 = User, 1 = Admin). Admins may edit and delete any recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    User = 0,
    Admin = 1,
}

impl UserRole {
    /// Convert from the stored value. Returns `None` for unknown values.
    pub fn from_i16(v: i16) -> Option<Self> {
        match v {
            0 => Some(Self::User),
            1 => Some(Self::Admin),
            _ => None,
        }
    }

    pub fn as_i16(self) -> i16 {
        self as i16
    }
}

/// Why a username was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UsernameError {
    #[error("username must not be empty")]
    Empty,
    #[error("username must be at most 150 characters")]
    TooLong,
    #[error("username 'me' is reserved")]
    Reserved,
    #[error("only letters, digits and @.+-_ are allowed")]
    InvalidCharacters,
}

/// Validate a username: letters, digits and `@.+-_`, 1–150 chars. Reserved: "me".
pub fn validate_username(username: &str) -> Result<(), UsernameError> {
    if username.is_empty() {
        return Err(UsernameError::Empty);
    }
    if username.chars().count() > USERNAME_MAX_LEN {
        return Err(UsernameError::TooLong);
    }
    if username == "me" {
        return Err(UsernameError::Reserved);
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(UsernameError::InvalidCharacters);
    }
    Ok(())
}

/// Minimal structural check: one `@` with a non-empty local part and a dotted domain.
pub fn is_valid_email(email: &str) -> bool {
    if email.len() > EMAIL_MAX_LEN || email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split('.')
            .filter(|label| !label.is_empty())
            .count()
            >= 2
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

/// Why a password was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PasswordError {
    #[error("password must be at least 8 characters")]
    TooShort,
    #[error("password must be at most 150 characters")]
    TooLong,
    #[error("password must not be entirely numeric")]
    EntirelyNumeric,
}

pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    let len = password.chars().count();
    if len < PASSWORD_MIN_LEN {
        return Err(PasswordError::TooShort);
    }
    if len > PASSWORD_MAX_LEN {
        return Err(PasswordError::TooLong);
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        return Err(PasswordError::EntirelyNumeric);
    }
    Ok(())
}
