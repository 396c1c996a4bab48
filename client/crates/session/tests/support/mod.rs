//! Shared test doubles for the session store suites.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use platform::storage::{MemoryStorage, StorageBackend};
use session::domain::entity::user_record::{UserId, UserRecord};
use session::models::{AccountType, Email, Handle};
use session::{
    AuthGateway, FieldErrors, LoginInput, Navigator, SessionConfig, SessionError, SessionResult,
    SessionStore, ValidationSink,
};

/// Scripted gateway: queued results per operation, call counting,
/// optional artificial latency on fetches.
#[derive(Default)]
pub struct MockGateway {
    pub fetch_calls: AtomicUsize,
    pub sign_in_calls: AtomicUsize,
    pub sign_out_calls: AtomicUsize,
    fetch_results: Mutex<VecDeque<SessionResult<UserRecord>>>,
    sign_in_results: Mutex<VecDeque<SessionResult<()>>>,
    sign_out_results: Mutex<VecDeque<SessionResult<()>>>,
    fetch_delay: Mutex<Option<Duration>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_fetch(&self, result: SessionResult<UserRecord>) {
        self.fetch_results.lock().unwrap().push_back(result);
    }

    pub fn queue_user(&self, user: UserRecord) {
        self.queue_fetch(Ok(user));
    }

    pub fn queue_sign_in(&self, result: SessionResult<()>) {
        self.sign_in_results.lock().unwrap().push_back(result);
    }

    pub fn queue_sign_out(&self, result: SessionResult<()>) {
        self.sign_out_results.lock().unwrap().push_back(result);
    }

    pub fn set_fetch_delay(&self, delay: Duration) {
        *self.fetch_delay.lock().unwrap() = Some(delay);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

impl AuthGateway for MockGateway {
    async fn prime_csrf(&self) -> SessionResult<()> {
        Ok(())
    }

    async fn sign_in(&self, _input: &LoginInput) -> SessionResult<()> {
        self.sign_in_calls.fetch_add(1, Ordering::SeqCst);
        self.sign_in_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()))
    }

    async fn sign_out(&self) -> SessionResult<()> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        self.sign_out_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()))
    }

    async fn fetch_current_user(&self) -> SessionResult<UserRecord> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.fetch_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.fetch_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(SessionError::Unauthenticated))
    }
}

/// Navigator that records every replace call.
#[derive(Default)]
pub struct RecordingNavigator {
    current: Mutex<String>,
    history: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self {
            current: Mutex::new("/".to_string()),
            history: Mutex::new(Vec::new()),
        }
    }

    /// Place the host on a path without recording a visit.
    pub fn set_current(&self, path: &str) {
        *self.current.lock().unwrap() = path.to_string();
    }

    pub fn visits(&self) -> Vec<String> {
        self.history.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        self.current.lock().unwrap().clone()
    }

    fn replace(&self, path: &str) {
        *self.current.lock().unwrap() = path.to_string();
        self.history.lock().unwrap().push(path.to_string());
    }
}

/// Sink that collects every rejection.
#[derive(Default)]
pub struct RecordingSink {
    rejections: Mutex<Vec<FieldErrors>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejections(&self) -> Vec<FieldErrors> {
        self.rejections.lock().unwrap().clone()
    }
}

impl ValidationSink for RecordingSink {
    fn reject(&self, errors: &FieldErrors) {
        self.rejections.lock().unwrap().push(errors.clone());
    }
}

pub fn sample_user(id: i64) -> UserRecord {
    UserRecord {
        id: UserId::from_raw(id),
        name: "Nora Nielsen".to_string(),
        email: Email::new("nora@example.com").unwrap(),
        username: Handle::new("needle.nora").unwrap(),
        slug: "nora-nielsen".to_string(),
        account_type: AccountType::Artist,
        bio: None,
        location: Some("Copenhagen".to_string()),
        avatar_url: None,
        created_at: "2024-05-01T12:00:00Z".parse().unwrap(),
    }
}

pub struct Harness {
    pub gateway: Arc<MockGateway>,
    pub navigator: Arc<RecordingNavigator>,
    pub storage: Arc<MemoryStorage>,
    pub store: SessionStore<MockGateway, RecordingNavigator>,
}

pub fn harness() -> Harness {
    let gateway = Arc::new(MockGateway::new());
    let navigator = Arc::new(RecordingNavigator::new());
    let storage = Arc::new(MemoryStorage::new());
    let store = SessionStore::new(
        gateway.clone(),
        navigator.clone(),
        storage.clone() as Arc<dyn StorageBackend>,
        SessionConfig::default(),
    );
    Harness {
        gateway,
        navigator,
        storage,
        store,
    }
}
