//! Username validation
//!
//! Runs before any network call so malformed input never reaches a transport.

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Longest username GitHub accepts
pub const MAX_USERNAME_LEN: usize = 39;

/// Alphanumeric runs joined by single hyphens
static USERNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]+(-[a-zA-Z0-9]+)*$").expect("valid username regex"));

/// Check that `username` is a valid GitHub username
///
/// Returns the username back on success so callers can chain on it.
///
/// # Errors
///
/// `Error::InvalidIdentifier` when the username is absent or empty, longer
/// than [`MAX_USERNAME_LEN`], or not made of alphanumeric runs joined by
/// single hyphens.
pub fn validate_username(username: Option<&str>) -> Result<&str> {
    let username = match username {
        Some(u) if !u.is_empty() => u,
        _ => return Err(Error::invalid_identifier("username is required")),
    };

    if username.len() > MAX_USERNAME_LEN || !USERNAME_PATTERN.is_match(username) {
        return Err(Error::invalid_identifier(format!(
            "'{}' is not a valid GitHub username. Usernames may only contain alphanumeric \
             characters or single hyphens, cannot begin or end with a hyphen, and are at \
             most {} characters long",
            username, MAX_USERNAME_LEN
        )));
    }

    Ok(username)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejects(input: Option<&str>) -> bool {
        matches!(validate_username(input), Err(Error::InvalidIdentifier(_)))
    }

    #[test]
    fn test_valid_usernames() {
        let longest = "x".repeat(MAX_USERNAME_LEN);
        for name in ["valid-username", "a", "octocat", "A1-b2-C3", longest.as_str()] {
            assert_eq!(validate_username(Some(name)).unwrap(), name);
        }
    }

    #[test]
    fn test_missing_or_empty() {
        assert!(rejects(None));
        assert!(rejects(Some("")));
    }

    #[test]
    fn test_hyphen_placement() {
        assert!(rejects(Some("-username")));
        assert!(rejects(Some("username-")));
        assert!(rejects(Some("in--valid")));
        assert!(rejects(Some("-")));
    }

    #[test]
    fn test_invalid_characters() {
        assert!(rejects(Some("in_valid")));
        assert!(rejects(Some("in valid")));
        assert!(rejects(Some("in.valid")));
        assert!(rejects(Some("ünïcode")));
    }

    #[test]
    fn test_too_long() {
        assert!(rejects(Some("tooooooloooooooooooooooooooooooooooooong")));
        assert!(rejects(Some(&"x".repeat(40))));
    }
}
