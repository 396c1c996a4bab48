//! Persistent Key/Value Storage
//!
//! The client persists small string entries (cached records, UI flags)
//! under well-known keys. On a desktop host this is a single JSON document
//! on disk; in tests it is an in-memory map; on hosts without a writable
//! data directory every operation is a silent no-op.
//!
//! Mutation never fails from the caller's perspective: write errors are
//! logged and swallowed, and removing an absent key is a no-op.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Key/value persistence seam
///
/// Implementations must be idempotent under `remove` and tolerate
/// concurrent access from a single process.
pub trait StorageBackend: Send + Sync {
    /// Read an entry, `None` if absent
    fn get(&self, key: &str) -> Option<String>;

    /// Write or replace an entry
    fn set(&self, key: &str, value: &str);

    /// Delete an entry; absent keys are a no-op
    fn remove(&self, key: &str);

    /// Whether this backend actually persists anything
    ///
    /// `false` signals a disabled environment (no writable data
    /// directory); callers that only exist to mutate storage should
    /// return immediately.
    fn is_available(&self) -> bool {
        true
    }

    /// Whether an entry exists
    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

fn lock_entries(entries: &Mutex<HashMap<String, String>>) -> MutexGuard<'_, HashMap<String, String>> {
    match entries.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

// ============================================================================
// In-memory backend
// ============================================================================

/// In-memory backend for tests and ephemeral runs
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        lock_entries(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        lock_entries(&self.entries).insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        lock_entries(&self.entries).remove(key);
    }
}

// ============================================================================
// File-backed backend
// ============================================================================

/// Single-document JSON backend
///
/// The whole map is loaded on open and rewritten on every mutation.
/// Entries are small (cached user blob, a handful of UI flags), so the
/// rewrite cost is negligible.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStorage {
    /// Open (or create) the storage document at `path`
    ///
    /// A missing file starts empty. A corrupt file is logged and treated
    /// as empty rather than failing the host.
    pub fn open(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<HashMap<String, String>>(&raw) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Corrupt storage document, starting empty");
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e),
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// The document path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &HashMap<String, String>) {
        let raw = match serde_json::to_string(entries) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize storage document");
                return;
            }
        };
        if let Err(e) = fs::write(&self.path, raw) {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to write storage document");
        }
    }
}

impl StorageBackend for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        lock_entries(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = lock_entries(&self.entries);
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = lock_entries(&self.entries);
        if entries.remove(key).is_some() {
            self.persist(&entries);
        }
    }
}

// ============================================================================
// Disabled backend
// ============================================================================

/// No-op backend for hosts without persistent storage
///
/// Reads return nothing, writes vanish, and nothing ever errors.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullStorage;

impl StorageBackend for NullStorage {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, _key: &str, _value: &str) {}

    fn remove(&self, _key: &str) {}

    fn is_available(&self) -> bool {
        false
    }
}

// ============================================================================
// Environment probe
// ============================================================================

/// Open the default storage location for `app`
///
/// Probes the platform data directory; when none exists or it cannot be
/// created (headless hosts, CI sandboxes), storage is disabled rather
/// than erroring.
pub fn open_default(app: &str) -> Arc<dyn StorageBackend> {
    let Some(base) = dirs::data_dir() else {
        tracing::debug!("No platform data directory, storage disabled");
        return Arc::new(NullStorage);
    };

    let dir = base.join(app);
    if let Err(e) = fs::create_dir_all(&dir) {
        tracing::warn!(path = %dir.display(), error = %e, "Cannot create data directory, storage disabled");
        return Arc::new(NullStorage);
    }

    match FileStorage::open(dir.join("storage.json")) {
        Ok(storage) => Arc::new(storage),
        Err(e) => {
            tracing::warn!(error = %e, "Cannot open storage document, storage disabled");
            Arc::new(NullStorage)
        }
    }
}
