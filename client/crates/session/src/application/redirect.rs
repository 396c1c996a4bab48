//! Redirect Policy
//!
//! Declarative navigation for a surface, driven by the desired access
//! mode and the current session. Evaluation is edge-triggered: each
//! policy remembers the snapshot epoch it last acted on, so re-running
//! it against an unchanged session does nothing. Expiry cleanup itself
//! runs inside the store the moment the 401 is reconciled; the policy
//! only enforces where the host should be standing.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::application::store::SessionStore;
use crate::domain::gateway::{AuthGateway, Navigator};
use crate::domain::session::Transition;

/// Who may be on the surface this policy guards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessMode {
    /// Anyone
    #[default]
    Open,
    /// Only signed-out visitors (sign-in and onboarding pages)
    GuestOnly,
    /// Only signed-in users
    AuthRequired,
}

/// Navigation targets for the two directions
#[derive(Debug, Clone)]
pub struct RedirectTargets {
    /// Where a signed-in user lands when hitting a guest-only surface
    pub if_authenticated: String,
    /// Where an expired session lands
    pub if_unauthenticated: String,
}

impl Default for RedirectTargets {
    fn default() -> Self {
        Self {
            if_authenticated: "/".to_string(),
            if_unauthenticated: "/login".to_string(),
        }
    }
}

/// Edge-triggered redirect rule
pub struct RedirectPolicy {
    mode: AccessMode,
    targets: RedirectTargets,
    /// Epoch of the snapshot last evaluated; `u64::MAX` means never
    last_epoch: AtomicU64,
}

impl RedirectPolicy {
    pub fn new(mode: AccessMode) -> Self {
        Self::with_targets(mode, RedirectTargets::default())
    }

    pub fn with_targets(mode: AccessMode, targets: RedirectTargets) -> Self {
        Self {
            mode,
            targets,
            last_epoch: AtomicU64::new(u64::MAX),
        }
    }

    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    /// Apply the rule to the store's current session
    ///
    /// A no-op when the session has not changed since the last
    /// evaluation. Navigation is additionally suppressed by the store
    /// when the host already stands on the target path, so even a first
    /// evaluation after an expiry-triggered cleanup moves nothing.
    pub fn evaluate<G, N>(&self, store: &SessionStore<G, N>)
    where
        G: AuthGateway + Send + Sync,
        N: Navigator,
    {
        let snapshot = store.peek();

        let previous = self.last_epoch.swap(snapshot.epoch, Ordering::AcqRel);
        if previous == snapshot.epoch {
            return;
        }

        match self.mode {
            AccessMode::Open => {}
            AccessMode::GuestOnly => {
                if snapshot.is_authenticated() {
                    tracing::debug!(
                        target = %self.targets.if_authenticated,
                        "Signed-in user on a guest-only surface"
                    );
                    store.navigate_to(&self.targets.if_authenticated);
                }
            }
            AccessMode::AuthRequired => {
                // only a confirmed expiry moves the host; an initial
                // unauthenticated load renders the surface's own guest
                // treatment without side effects
                if snapshot.transition == Transition::Expiry
                    && !snapshot.is_authenticated()
                    && !snapshot.is_authenticating
                {
                    store.navigate_to(&self.targets.if_unauthenticated);
                }
            }
        }
    }
}
