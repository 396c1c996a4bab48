//! Session Error Types
//!
//! This module provides session-specific error variants that integrate
//! with the unified `kernel::error::AppError` system. Every gateway
//! failure is absorbed and classified here; surfaces only ever observe
//! session state or an error returned from `login`.

use std::collections::BTreeMap;
use std::fmt;

use kernel::error::{app_error::AppError, kind::ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Session-specific result type alias
pub type SessionResult<T> = Result<T, SessionError>;

/// Structured field errors from a rejected submission (HTTP 422)
///
/// Mirrors the auth API's validation payload: a summary message plus
/// per-field message lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors {
    /// Summary message
    pub message: String,
    /// Per-field messages, keyed by input name
    #[serde(default, rename = "errors")]
    pub fields: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    /// Messages for a single field, if any
    pub fn field(&self, name: &str) -> Option<&[String]> {
        self.fields.get(name).map(Vec::as_slice)
    }

    /// Whether any field carries a message
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if !self.fields.is_empty() {
            let names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
            write!(f, " ({})", names.join(", "))?;
        }
        Ok(())
    }
}

/// Session-specific error variants
#[derive(Debug, Error)]
pub enum SessionError {
    /// The API rejected the request as unauthenticated (401)
    #[error("Not authenticated")]
    Unauthenticated,

    /// The API rejected a submission with field errors (422)
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Any other response-bearing failure from the auth API
    #[error("Auth API error ({status}): {message}")]
    Gateway { status: u16, message: String },

    /// The request never produced a response
    #[error("Transport error: {0}")]
    Transport(String),

    /// Local persistence failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SessionError {
    /// Classify a non-success response status
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        match status {
            401 => SessionError::Unauthenticated,
            _ => SessionError::Gateway {
                status,
                message: message.into(),
            },
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::Unauthenticated => ErrorKind::Unauthorized,
            SessionError::Validation(_) => ErrorKind::UnprocessableEntity,
            SessionError::Gateway { status, .. } => ErrorKind::from_status(*status),
            SessionError::Transport(_) => ErrorKind::Transport,
            SessionError::Storage(_) | SessionError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// HTTP status associated with this error, if it came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            SessionError::Unauthenticated => Some(401),
            SessionError::Validation(_) => Some(422),
            SessionError::Gateway { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this is the expected "no valid session" signal
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, SessionError::Unauthenticated)
    }

    /// Log the error with the appropriate level
    ///
    /// 401s are ordinary traffic and stay at debug; transport blips warn;
    /// everything else is an application error.
    pub(crate) fn log(&self) {
        match self {
            SessionError::Unauthenticated => {
                tracing::debug!("Auth API reported no valid session");
            }
            SessionError::Validation(errors) => {
                tracing::debug!(fields = errors.fields.len(), "Submission rejected");
            }
            SessionError::Transport(msg) => {
                tracing::warn!(message = %msg, "Auth API unreachable");
            }
            SessionError::Gateway { status, message } => {
                tracing::warn!(status = status, message = %message, "Auth API error");
            }
            SessionError::Storage(msg) | SessionError::Internal(msg) => {
                tracing::error!(message = %msg, "Session internal error");
            }
        }
    }
}

impl From<AppError> for SessionError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::Unauthorized => SessionError::Unauthenticated,
            ErrorKind::Transport | ErrorKind::RequestTimeout => {
                SessionError::Transport(err.message().to_string())
            }
            kind => match kind.status_code() {
                Some(status) => SessionError::Gateway {
                    status,
                    message: err.message().to_string(),
                },
                None => SessionError::Internal(err.message().to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status() {
        assert!(SessionError::from_status(401, "").is_unauthenticated());
        match SessionError::from_status(500, "boom") {
            SessionError::Gateway { status, .. } => assert_eq!(status, 500),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            SessionError::Unauthenticated.kind(),
            ErrorKind::Unauthorized
        );
        assert_eq!(
            SessionError::Transport("down".into()).kind(),
            ErrorKind::Transport
        );
        let v = SessionError::Validation(FieldErrors {
            message: "invalid".into(),
            fields: BTreeMap::new(),
        });
        assert_eq!(v.kind(), ErrorKind::UnprocessableEntity);
        assert_eq!(v.status(), Some(422));
    }

    #[test]
    fn test_field_errors_parse() {
        let raw = r#"{"message":"The given data was invalid.","errors":{"email":["Required."]}}"#;
        let errors: FieldErrors = serde_json::from_str(raw).unwrap();
        assert_eq!(errors.field("email"), Some(&["Required.".to_string()][..]));
        assert!(!errors.is_empty());
        assert!(errors.to_string().contains("email"));
    }
}
