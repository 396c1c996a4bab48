//! Session Store
//!
//! Single source of truth for "who is logged in right now," reconciled
//! against the remote auth API. The store is an explicitly constructed,
//! dependency-injected instance; hosts create one at startup and hand
//! clones (cheap, Arc-backed) to every surface that needs session state.
//!
//! Concurrency model: overlapping async operations, not parallel
//! threads. At most one fetch of the current user is in flight at a
//! time; concurrent callers queue on the same critical section and
//! observe its result instead of issuing duplicate requests. A sign-in
//! exchange sets an explicit authenticating flag on the store state,
//! which suppresses expiry detection for its duration; a 401 from an
//! overlapping background refetch must not be read as "session expired"
//! while credentials are being exchanged.

use std::sync::{Arc, Mutex, MutexGuard};

use platform::storage::StorageBackend;

use crate::application::config::SessionConfig;
use crate::application::janitor::CacheJanitor;
use crate::domain::cache_key::CacheKey;
use crate::domain::entity::user_record::UserRecord;
use crate::domain::gateway::{AuthGateway, LoginInput, Navigator, ValidationSink};
use crate::domain::session::{AuthState, ErrorInfo, SessionSnapshot, Transition};
use crate::error::{SessionError, SessionResult};

/// Outcome of a login attempt that did not error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStatus {
    /// Credentials accepted, session established
    SignedIn,
    /// Credentials rejected with field errors (delivered to the sink)
    Rejected,
}

/// Mutable store state, guarded by one lock
struct StoreState {
    state: AuthState,
    error: Option<ErrorInfo>,
    loading: bool,
    authenticating: bool,
    epoch: u64,
    transition: Transition,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            state: AuthState::Unknown,
            error: None,
            loading: false,
            authenticating: false,
            epoch: 0,
            transition: Transition::Boot,
        }
    }
}

/// Side effect decided while the state lock was held, run after release
enum FetchEffect {
    /// Fresh record confirmed, persist the cache entries
    Persist(UserRecord),
    /// Confirmed expiry, purge everything and land on the sign-in route
    ExpiredCleanup,
    Nothing,
}

struct StoreInner<G, N>
where
    G: AuthGateway + Send + Sync,
    N: Navigator,
{
    gateway: Arc<G>,
    navigator: Arc<N>,
    storage: Arc<dyn StorageBackend>,
    janitor: CacheJanitor,
    config: SessionConfig,
    state: Mutex<StoreState>,
    /// Serializes fetches of the current user
    fetch_gate: tokio::sync::Mutex<()>,
}

/// Session store
pub struct SessionStore<G, N>
where
    G: AuthGateway + Send + Sync,
    N: Navigator,
{
    inner: Arc<StoreInner<G, N>>,
}

impl<G, N> Clone for SessionStore<G, N>
where
    G: AuthGateway + Send + Sync,
    N: Navigator,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<G, N> SessionStore<G, N>
where
    G: AuthGateway + Send + Sync,
    N: Navigator,
{
    pub fn new(
        gateway: Arc<G>,
        navigator: Arc<N>,
        storage: Arc<dyn StorageBackend>,
        config: SessionConfig,
    ) -> Self {
        let janitor = CacheJanitor::new(storage.clone());
        Self {
            inner: Arc::new(StoreInner {
                gateway,
                navigator,
                storage,
                janitor,
                config,
                state: Mutex::new(StoreState::default()),
                fetch_gate: tokio::sync::Mutex::new(()),
            }),
        }
    }

    /// The janitor bound to this store's storage
    pub fn janitor(&self) -> &CacheJanitor {
        &self.inner.janitor
    }

    // ========================================================================
    // Reading session state
    // ========================================================================

    /// Current snapshot without triggering anything
    pub fn peek(&self) -> SessionSnapshot {
        Self::snapshot_of(&self.state_guard())
    }

    /// Current snapshot, lazily resolving the first fetch
    ///
    /// When the state is still Unknown and no fetch has concluded (a
    /// terminated-in-error fetch counts as concluded), exactly one
    /// request is issued no matter how many callers arrive concurrently;
    /// late callers wait on the same critical section and return the
    /// reconciled snapshot.
    pub async fn session(&self) -> SessionSnapshot {
        let (wants_fetch, epoch_before) = {
            let st = self.state_guard();
            (
                matches!(st.state, AuthState::Unknown) && st.error.is_none(),
                st.epoch,
            )
        };

        if wants_fetch {
            let _gate = self.inner.fetch_gate.lock().await;
            let still_unresolved = {
                let st = self.state_guard();
                st.epoch == epoch_before
                    && matches!(st.state, AuthState::Unknown)
                    && st.error.is_none()
            };
            if still_unresolved {
                self.fetch_and_reconcile().await;
            }
        }

        self.peek()
    }

    /// Force a revalidating refetch of the current user
    pub async fn refresh(&self) {
        let _gate = self.inner.fetch_gate.lock().await;
        self.fetch_and_reconcile().await;
    }

    // ========================================================================
    // Sign in / sign out
    // ========================================================================

    /// Exchange credentials for a session
    ///
    /// Order of effects: anti-forgery priming, authenticating flag up,
    /// credential submit, then on success a forced revalidating refetch
    /// before the flag drops. On failure the state is overridden to
    /// Unauthenticated without revalidation and identity-linked cache
    /// entries are purged; a validation rejection (422) goes to `sink`
    /// and resolves `Ok(LoginStatus::Rejected)`, anything else
    /// propagates as the error it was.
    pub async fn login(
        &self,
        input: LoginInput,
        sink: &dyn ValidationSink,
    ) -> SessionResult<LoginStatus> {
        self.inner.gateway.prime_csrf().await?;

        self.set_authenticating(true);

        match self.inner.gateway.sign_in(&input).await {
            Ok(()) => {
                tracing::info!(remember = input.remember, "Signed in, revalidating session");
                self.refresh().await;
                self.set_authenticating(false);
                Ok(LoginStatus::SignedIn)
            }
            Err(err) => {
                self.apply_override(AuthState::Unauthenticated, Transition::SignIn);
                self.inner.janitor.purge_user_specific();
                self.set_authenticating(false);

                match err {
                    SessionError::Validation(errors) => {
                        tracing::debug!(fields = errors.fields.len(), "Sign-in rejected");
                        sink.reject(&errors);
                        Ok(LoginStatus::Rejected)
                    }
                    other => {
                        other.log();
                        Err(other)
                    }
                }
            }
        }
    }

    /// End the session: best-effort remote, guaranteed local
    ///
    /// The remote call may fail (network down, session already gone);
    /// that is logged and swallowed. Local effects always run: the state
    /// becomes Unauthenticated without revalidation, every registered
    /// cache entry is purged, and the host lands on the sign-in route
    /// unless it is already there.
    pub async fn logout(&self) {
        if let Err(err) = self.inner.gateway.sign_out().await {
            tracing::warn!(error = %err, "Remote sign-out failed, clearing local session anyway");
        }

        self.apply_override(AuthState::Unauthenticated, Transition::SignOut);
        self.inner.janitor.purge_all();
        self.navigate_to(&self.inner.config.routes.sign_in);
        tracing::info!("Signed out");
    }

    /// Low-level state override
    ///
    /// Sets the state directly and optionally follows up with a
    /// revalidating refetch.
    pub async fn mutate(&self, state: AuthState, revalidate: bool) {
        self.apply_override(state, Transition::Override);
        if revalidate {
            self.refresh().await;
        }
    }

    /// Ask the host to move, unless it is already there
    pub fn navigate_to(&self, path: &str) {
        if self.inner.navigator.current_path() != path {
            self.inner.navigator.replace(path);
        }
    }

    // ========================================================================
    // Reconciliation
    // ========================================================================

    async fn fetch_and_reconcile(&self) {
        self.state_guard().loading = true;
        let result = self.inner.gateway.fetch_current_user().await;
        let effect = self.apply_fetch_result(result);
        self.run_effect(effect);
    }

    /// Fold a fetch outcome into the state (lock held), deciding which
    /// side effect to run afterwards
    fn apply_fetch_result(&self, result: SessionResult<UserRecord>) -> FetchEffect {
        let mut st = self.state_guard();
        st.loading = false;

        match result {
            Ok(user) => {
                let transition = if st.authenticating {
                    Transition::SignIn
                } else if st.state.is_known() {
                    Transition::Refresh
                } else {
                    Transition::InitialLoad
                };
                st.state = AuthState::Authenticated(user.clone());
                st.error = None;
                st.epoch += 1;
                st.transition = transition;
                tracing::debug!(user_id = %user.id, "Session confirmed");
                FetchEffect::Persist(user)
            }
            Err(err) if err.is_unauthenticated() => {
                if st.authenticating {
                    // transient while the credential exchange settles
                    tracing::debug!("Ignoring 401 during sign-in exchange");
                    return FetchEffect::Nothing;
                }

                // expiry only when this very store had seen a user;
                // a persisted flag could be stale, memory cannot
                let had_user = st.state.is_authenticated();
                let was_known = st.state.is_known();

                st.state = AuthState::Unauthenticated;
                st.error = None;
                st.epoch += 1;

                if had_user {
                    st.transition = Transition::Expiry;
                    FetchEffect::ExpiredCleanup
                } else {
                    st.transition = if was_known {
                        Transition::Refresh
                    } else {
                        Transition::InitialLoad
                    };
                    FetchEffect::Nothing
                }
            }
            Err(err) => {
                err.log();
                // stale-but-present: a known user survives a transient
                // failure, only the error slot changes
                st.error = Some(ErrorInfo::from(&err));
                st.epoch += 1;
                FetchEffect::Nothing
            }
        }
    }

    fn run_effect(&self, effect: FetchEffect) {
        match effect {
            FetchEffect::Persist(user) => self.persist_user(&user),
            FetchEffect::ExpiredCleanup => {
                tracing::info!("Session expired, clearing local state");
                self.inner.janitor.purge_all();
                self.navigate_to(&self.inner.config.routes.sign_in);
            }
            FetchEffect::Nothing => {}
        }
    }

    fn persist_user(&self, user: &UserRecord) {
        match serde_json::to_string(user) {
            Ok(blob) => {
                self.inner.storage.set(CacheKey::UserData.name(), &blob);
                self.inner
                    .storage
                    .set(CacheKey::UserId.name(), &user.id.to_string());
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to serialize user record for cache");
            }
        }
    }

    // ========================================================================
    // State plumbing
    // ========================================================================

    fn apply_override(&self, state: AuthState, transition: Transition) {
        let mut st = self.state_guard();
        st.state = state;
        st.error = None;
        st.epoch += 1;
        st.transition = transition;
    }

    fn set_authenticating(&self, value: bool) {
        self.state_guard().authenticating = value;
    }

    fn state_guard(&self) -> MutexGuard<'_, StoreState> {
        match self.inner.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn snapshot_of(st: &StoreState) -> SessionSnapshot {
        SessionSnapshot {
            state: st.state.clone(),
            error: st.error.clone(),
            is_loading: st.loading,
            is_authenticating: st.authenticating,
            epoch: st.epoch,
            transition: st.transition,
        }
    }
}
