//! # Key-Value Session Storage
//!
//! The terminal keeps a handful of values under fixed string keys: the
//! bearer token, the display username, a numeric user id, a one-shot
//! "just logged in" flag, the outlet id, and at most one offline invoice
//! draft blob. The persistent store is a JSON file in the platform config
//! directory; the ephemeral store is in-memory and dies with the process.
//!
//! ## Consistency Model
//! Both stores are process-wide shared state behind an interior mutex with
//! last-writer-wins semantics. There is no cross-process locking; two
//! terminals pointed at the same file will clobber each other, which
//! matches how this data has always behaved.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::warn;

// =============================================================================
// Well-Known Keys
// =============================================================================

/// Fixed keys in the persistent and ephemeral stores.
pub mod keys {
    /// Bearer token (persistent).
    pub const ACCESS_TOKEN: &str = "access_token";
    /// Older installs stored the token under this key (persistent).
    pub const LEGACY_TOKEN: &str = "token";
    /// Display username (persistent).
    pub const USERNAME: &str = "username";
    /// Numeric user id from the login response (persistent).
    pub const USER_ID: &str = "user_id";
    /// One-shot flag set on successful login (persistent).
    pub const LOGIN_SUCCESS: &str = "login_success";
    /// Configured outlet id (persistent).
    pub const OUTLET_ID: &str = "outlet_id";
    /// The offline invoice draft blob (persistent).
    pub const OFFLINE_DRAFT: &str = "pos_local_draft_invoice";
    /// Session guard flag (ephemeral).
    pub const IS_AUTHENTICATED: &str = "is_authenticated";
}

// =============================================================================
// Store Trait
// =============================================================================

/// String-keyed storage. Both the persistent and the ephemeral store speak
/// this interface, so everything above them is storage-agnostic.
pub trait KeyStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

// =============================================================================
// In-Memory Store
// =============================================================================

/// Ephemeral per-process store. Holds the session guard flag.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .expect("store mutex poisoned")
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .lock()
            .expect("store mutex poisoned")
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values
            .lock()
            .expect("store mutex poisoned")
            .remove(key);
    }
}

// =============================================================================
// File-Backed Store
// =============================================================================

/// Persistent store: a JSON object in one file, written through on every
/// mutation. Load and save failures degrade to warnings; losing a cached
/// value means re-logging-in, not data corruption.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Opens (or initializes) the store at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = Self::load(&path);
        FileStore {
            path,
            values: Mutex::new(values),
        }
    }

    /// Opens the store at the platform default location.
    pub fn open_default() -> Self {
        Self::open(default_session_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> HashMap<String, String> {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(values) => values,
                Err(e) => {
                    warn!(?path, error = %e, "session file unreadable, starting empty");
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        }
    }

    fn persist(&self, values: &HashMap<String, String>) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!(?parent, error = %e, "could not create session directory");
                return;
            }
        }
        match serde_json::to_string_pretty(values) {
            Ok(contents) => {
                if let Err(e) = std::fs::write(&self.path, contents) {
                    warn!(path = ?self.path, error = %e, "could not write session file");
                }
            }
            Err(e) => warn!(error = %e, "could not serialize session file"),
        }
    }
}

impl KeyStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .expect("store mutex poisoned")
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut values = self.values.lock().expect("store mutex poisoned");
        values.insert(key.to_string(), value.to_string());
        self.persist(&values);
    }

    fn remove(&self, key: &str) {
        let mut values = self.values.lock().expect("store mutex poisoned");
        if values.remove(key).is_some() {
            self.persist(&values);
        }
    }
}

/// Platform default location for the session file.
pub fn default_session_path() -> PathBuf {
    directories::ProjectDirs::from("com", "vendra", "pos")
        .map(|dirs| dirs.config_dir().join("session.json"))
        .unwrap_or_else(|| PathBuf::from("vendra-session.json"))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k"), None);
        store.set("k", "v");
        assert_eq!(store.get("k").as_deref(), Some("v"));
        store.set("k", "v2"); // last writer wins
        assert_eq!(store.get("k").as_deref(), Some("v2"));
        store.remove("k");
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = std::env::temp_dir().join("vendra-storage-test-rt");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("session.json");

        let store = FileStore::open(&path);
        store.set(keys::ACCESS_TOKEN, "tok-1");
        store.set(keys::USER_ID, "4");

        // A second open sees what the first wrote.
        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get(keys::ACCESS_TOKEN).as_deref(), Some("tok-1"));
        assert_eq!(reopened.get(keys::USER_ID).as_deref(), Some("4"));

        reopened.remove(keys::ACCESS_TOKEN);
        let third = FileStore::open(&path);
        assert_eq!(third.get(keys::ACCESS_TOKEN), None);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_file_store_survives_corrupt_file() {
        let dir = std::env::temp_dir().join("vendra-storage-test-corrupt");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("session.json");
        std::fs::write(&path, "not json at all {{{").unwrap();

        let store = FileStore::open(&path);
        assert_eq!(store.get("anything"), None);
        store.set("k", "v");
        assert_eq!(store.get("k").as_deref(), Some("v"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
