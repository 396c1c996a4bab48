//! Session (Client Auth State) Module
//!
//! Clean Architecture structure:
//! - `domain/` - Session state model, entities, cache key registry, gateway traits
//! - `application/` - Session store, cache janitor, redirect policy
//! - `infra/` - HTTP gateway and host adapters
//!
//! ## Features
//! - Single source of truth for the signed-in user, reconciled against
//!   the remote auth API with at-most-one fetch in flight
//! - Explicit three-way state (Unknown / Authenticated / Unauthenticated)
//! - Cookie-session sign-in with CSRF priming and structured 422 handling
//! - Best-effort remote, guaranteed local sign-out
//! - Expiry detection with full local cache purge, guarded against the
//!   sign-in exchange
//! - Declarative, edge-triggered redirect policy per surface
//!
//! ## Failure Model
//! - 401 is expected traffic; whether it means "never signed in" or
//!   "session expired" depends on what this store had already observed
//! - Other failures surface as an error slot without discarding a
//!   previously confirmed user

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;

// Re-exports for convenience
pub use application::config::{RouteConfig, SessionConfig};
pub use application::janitor::CacheJanitor;
pub use application::redirect::{AccessMode, RedirectPolicy, RedirectTargets};
pub use application::store::{LoginStatus, SessionStore};
pub use domain::gateway::{AuthGateway, LoginInput, Navigator, ValidationSink};
pub use domain::session::{AuthState, SessionPhase, SessionSnapshot, Transition};
pub use error::{FieldErrors, SessionError, SessionResult};
pub use infra::http::{HttpAuthGateway, HttpGatewayConfig};
pub use infra::nav::LoggingNavigator;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod models {
    pub use crate::domain::entity::user_record::{UserId, UserRecord};
    pub use crate::domain::value_object::account_type::AccountType;
    pub use crate::domain::value_object::email::Email;
    pub use crate::domain::value_object::handle::Handle;
}

pub mod cache {
    pub use crate::domain::cache_key::{CacheClass, CacheKey};
}
