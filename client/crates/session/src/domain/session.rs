//! Session State
//!
//! The client's current belief about who is logged in, modeled as an
//! explicit three-way state. "Not yet fetched" and "confirmed signed
//! out" are different facts and must never collapse into one another:
//! surfaces render a skeleton for the former and a guest view for the
//! latter, and expiry detection depends on the distinction.

use kernel::error::kind::ErrorKind;
use serde::Serialize;

use crate::domain::entity::user_record::UserRecord;
use crate::error::SessionError;

/// Three-way authentication state
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AuthState {
    /// No fetch has completed yet
    #[default]
    Unknown,
    /// The API confirmed this user
    Authenticated(UserRecord),
    /// The API confirmed there is no valid session
    Unauthenticated,
}

impl AuthState {
    /// The user record, when authenticated
    pub fn user(&self) -> Option<&UserRecord> {
        match self {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }

    /// Whether a fetch has ever resolved
    pub fn is_known(&self) -> bool {
        !matches!(self, AuthState::Unknown)
    }
}

/// What caused the most recent state change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// Store constructed, nothing observed yet
    Boot,
    /// First fetch resolved
    InitialLoad,
    /// Credential exchange concluded
    SignIn,
    /// Explicit sign-out
    SignOut,
    /// A previously valid session stopped being accepted
    Expiry,
    /// A later fetch replaced the record
    Refresh,
    /// Direct mutate() call
    Override,
}

/// Classified error surfaced on the session
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorInfo {
    /// HTTP status, when the failure came from a response
    pub status: Option<u16>,
    /// Classification
    pub kind: ErrorKind,
    /// Human-readable message
    pub message: String,
}

impl From<&SessionError> for ErrorInfo {
    fn from(err: &SessionError) -> Self {
        Self {
            status: err.status(),
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Conceptual phase of the session, derived for display and policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Unknown,
    Authenticating,
    Authenticated,
    Unauthenticated,
    Error,
}

/// The value surfaces observe
///
/// Snapshots are cheap clones of the store's state at one instant.
/// `epoch` increments on every state change, which lets observers key
/// edge-triggered reactions off "did anything change since I last
/// looked" instead of re-running effects every poll.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    /// Current authentication state
    pub state: AuthState,
    /// Last classified failure, cleared on any successful resolution
    pub error: Option<ErrorInfo>,
    /// A fetch is in flight
    pub is_loading: bool,
    /// A credential exchange is in flight
    pub is_authenticating: bool,
    /// State-change counter
    pub epoch: u64,
    /// What caused the last state change
    pub transition: Transition,
}

impl SessionSnapshot {
    pub fn user(&self) -> Option<&UserRecord> {
        self.state.user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    /// Derive the conceptual phase
    ///
    /// A kept-but-stale authenticated user still reads as Authenticated;
    /// the error slot carries the trouble alongside.
    pub fn phase(&self) -> SessionPhase {
        if self.is_authenticating {
            return SessionPhase::Authenticating;
        }
        match &self.state {
            AuthState::Authenticated(_) => SessionPhase::Authenticated,
            AuthState::Unauthenticated if self.error.is_none() => SessionPhase::Unauthenticated,
            AuthState::Unknown if self.error.is_none() => SessionPhase::Unknown,
            _ => SessionPhase::Error,
        }
    }
}
