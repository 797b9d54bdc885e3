use sled::Db;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use crate::error::FeedResult;

/// Key holding the JSON array of registered users
pub const USERS_KEY: &str = "users";
/// Key holding the JSON-encoded session, absent when logged out
pub const CURRENT_USER_KEY: &str = "currentUser";
/// Key holding the JSON array of posts, most recent first
pub const POSTS_KEY: &str = "posts";

/// Synchronous string key-value medium behind every collection.
///
/// There are no transactional guarantees across keys: callers read a whole
/// value, change it in memory and write it back, so two writers sharing a
/// store can overwrite each other (last write wins).
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> FeedResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> FeedResult<()>;
    fn remove(&self, key: &str) -> FeedResult<()>;
}

/// Persistent store on top of a single Sled tree.
#[derive(Clone)]  // Sled handles are cheap to clone and share
pub struct SledStore {
    db: Db,
    kv_tree: sled::Tree,
}

impl SledStore {
    /// Open or create the Sled database at the given path
    pub fn open(path: impl AsRef<Path>) -> FeedResult<Self> {
        let db = sled::open(path)?;
        let kv_tree = db.open_tree("kv")?;
        Ok(Self { db, kv_tree })
    }

    /// Block until pending writes reach disk.
    pub fn flush(&self) -> FeedResult<()> {
        self.db.flush()?;
        Ok(())
    }
}

impl KeyValueStore for SledStore {
    fn get(&self, key: &str) -> FeedResult<Option<String>> {
        match self.kv_tree.get(key.as_bytes())? {
            Some(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> FeedResult<()> {
        self.kv_tree.insert(key.as_bytes(), value.as_bytes())?;
        Ok(())
    }

    fn remove(&self, key: &str) -> FeedResult<()> {
        self.kv_tree.remove(key.as_bytes())?;
        Ok(())
    }
}

/// Process-local store, used by tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a consistent map: every write is a single insert/remove.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> FeedResult<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> FeedResult<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> FeedResult<()> {
        self.entries().remove(key);
        Ok(())
    }
}

/// Seed the collection keys with empty arrays if they are missing.
pub fn initialize(store: &dyn KeyValueStore) -> FeedResult<()> {
    for key in [USERS_KEY, POSTS_KEY] {
        if store.get(key)?.is_none() {
            store.set(key, "[]")?;
        }
    }
    Ok(())
}
