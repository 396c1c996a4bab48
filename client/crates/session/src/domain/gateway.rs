//! Gateway Seams
//!
//! Interfaces to the collaborators the session layer does not own: the
//! remote auth API, the host's navigation surface, and the caller's
//! receiver for validation errors. Implementations live in the
//! infrastructure layer (and in test doubles).

use crate::domain::entity::user_record::UserRecord;
use crate::error::{FieldErrors, SessionResult};

/// Credentials submitted on sign-in
#[derive(Debug, Clone)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
    /// Ask the server for a long-lived session
    pub remember: bool,
}

/// Remote auth API seam
///
/// Contract notes:
/// - `fetch_current_user` resolves `Err(SessionError::Unauthenticated)`
///   when the API answers 401; that is an expected outcome, not a fault.
/// - `sign_in` resolves `Err(SessionError::Validation)` on a 422 with
///   field errors.
/// - `prime_csrf` must be called before the first `sign_in` on a fresh
///   client; the server seeds the anti-forgery token through it.
#[trait_variant::make(AuthGateway: Send)]
pub trait LocalAuthGateway {
    /// Obtain a fresh anti-forgery token
    async fn prime_csrf(&self) -> SessionResult<()>;

    /// Submit credentials; the session is established server-side
    async fn sign_in(&self, input: &LoginInput) -> SessionResult<()>;

    /// Invalidate the remote session (best effort)
    async fn sign_out(&self) -> SessionResult<()>;

    /// Fetch the record of the currently signed-in user
    async fn fetch_current_user(&self) -> SessionResult<UserRecord>;
}

/// Host navigation seam
///
/// The session layer never renders anything; it only asks the host to
/// move to a route. Implementations must treat `replace` with the
/// current path as a no-op-equivalent (the store already suppresses it,
/// this is the contract either way).
pub trait Navigator: Send + Sync {
    /// Path the host currently displays
    fn current_path(&self) -> String;

    /// Replace the current location
    fn replace(&self, path: &str);
}

/// Receiver for structured validation errors
///
/// Sign-in surfaces hand one of these to `login`; a 422 lands here
/// instead of propagating as an error.
pub trait ValidationSink: Send + Sync {
    fn reject(&self, errors: &FieldErrors);
}
