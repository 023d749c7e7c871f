//! Login input screening.
//!
//! Rejects obviously malicious login names before any directory or
//! database traffic. This is a coarse pre-filter, not an injection
//! defense; queries are parameterized and filters are escaped anyway.

use crate::error::{AuthError, AuthResult};

/// Maximum accepted login name length.
const MAX_USERNAME_LEN: usize = 100;

/// Substrings that mark a login name as suspicious.
const SUSPICIOUS_PATTERNS: &[&str] = &[
    "'", "\"", ";", "--", "/*", "*/", "union select", "select ", "insert ", "update ", "delete ",
    "drop ", "exec ", "xp_",
];

/// Screens a login name.
///
/// # Errors
///
/// Returns `AuthError::InvalidInput` for empty names, names longer than
/// 100 characters, or names containing SQL metacharacter patterns.
pub fn screen_username(username: &str) -> AuthResult<()> {
    if username.is_empty() || username.chars().count() > MAX_USERNAME_LEN {
        return Err(AuthError::InvalidInput);
    }

    let lowered = username.to_lowercase();
    if SUSPICIOUS_PATTERNS.iter().any(|p| lowered.contains(p)) {
        return Err(AuthError::InvalidInput);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_usernames() {
        assert!(screen_username("jdoe").is_ok());
        assert!(screen_username("john.doe@example.com").is_ok());
        assert!(screen_username("j_doe-2").is_ok());
    }

    #[test]
    fn rejects_sql_patterns() {
        assert!(screen_username("jdoe'--").is_err());
        assert!(screen_username("a\" OR 1=1").is_err());
        assert!(screen_username("x; DROP TABLE users").is_err());
        assert!(screen_username("1 UNION SELECT password").is_err());
    }

    #[test]
    fn rejects_empty_and_oversized() {
        assert!(screen_username("").is_err());
        assert!(screen_username(&"a".repeat(101)).is_err());
        assert!(screen_username(&"a".repeat(100)).is_ok());
    }
}
