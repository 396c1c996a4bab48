//! Handle Value Object
//!
//! The public username shown on profiles and used in mentions.
//! Canonical form is lowercase ASCII.
//!
//! Invariants:
//! - length 3..=30 characters
//! - allowed characters: a-z, 0-9, `_`, `.`, `-`
//! - starts and ends with an alphanumeric or `_`
//! - contains at least one alphanumeric
//! - no consecutive dots

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum handle length (in characters)
pub const HANDLE_MIN_LENGTH: usize = 3;

/// Maximum handle length (in characters)
pub const HANDLE_MAX_LENGTH: usize = 30;

const ALLOWED_SPECIAL_CHARS: &[char] = &['_', '.', '-'];

/// Public username value object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Handle(String);

impl Handle {
    /// Create a new handle with validation
    pub fn new(raw: impl Into<String>) -> AppResult<Self> {
        let handle = raw.into().trim().to_lowercase();

        let len = handle.chars().count();
        if !(HANDLE_MIN_LENGTH..=HANDLE_MAX_LENGTH).contains(&len) {
            return Err(AppError::bad_request(format!(
                "Handle must be {} to {} characters",
                HANDLE_MIN_LENGTH, HANDLE_MAX_LENGTH
            )));
        }

        if !handle
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || ALLOWED_SPECIAL_CHARS.contains(&c))
        {
            return Err(AppError::bad_request(
                "Handle may only contain letters, digits, '_', '.', '-'",
            ));
        }

        let edge_ok = |c: char| c.is_ascii_alphanumeric() || c == '_';
        // length is at least 3, so first/last always exist
        if !handle.chars().next().is_some_and(edge_ok)
            || !handle.chars().next_back().is_some_and(edge_ok)
        {
            return Err(AppError::bad_request(
                "Handle must start and end with a letter, digit, or '_'",
            ));
        }

        if !handle.chars().any(|c| c.is_ascii_alphanumeric()) {
            return Err(AppError::bad_request(
                "Handle must contain at least one letter or digit",
            ));
        }

        if handle.contains("..") {
            return Err(AppError::bad_request("Handle may not contain '..'"));
        }

        Ok(Self(handle))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
