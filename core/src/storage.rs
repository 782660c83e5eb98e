//! Key-value stores and the session accessors built on them.
//!
//! # Design
//! The client never reads ambient global state. The token and user snapshot
//! live in whatever `KeyValueStore` the caller injects: `MemoryStore` for
//! tests and short-lived sessions, `FileStore` for sessions that survive a
//! restart, `DetachedStore` when there is no interactive session at all.
//! `SessionStore` accessors are infallible: reads yield `None` on any
//! problem and write failures are logged.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{ResourceId, Role};

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session file io error: {0}")]
    Io(#[from] io::Error),

    #[error("session file encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Minimal string key-value storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
        }
    }
}

/// Store with no backing session: reads are empty, writes are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedStore;

impl KeyValueStore for DetachedStore {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, _key: &str, _value: &str) {}

    fn remove(&self, _key: &str) {}
}

/// Store persisted as a flat JSON object in a single file.
///
/// The file is read once on open and rewritten on every mutation.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match load_entries(&path) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "ignoring unreadable session file"
                );
                BTreeMap::new()
            }
        };
        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the current entries to disk.
    pub fn flush(&self) -> Result<(), StoreError> {
        match self.entries.read() {
            Ok(entries) => self.write_entries(&entries),
            Err(poisoned) => self.write_entries(&poisoned.into_inner()),
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Apply `f` and persist the result under one write lock, so the file
    /// always matches the last mutation.
    fn mutate(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) {
        let Ok(mut entries) = self.entries.write() else {
            return;
        };
        f(&mut entries);
        if let Err(err) = self.write_entries(&entries) {
            tracing::warn!(
                path = %self.path.display(),
                error = %err,
                "failed to persist session file"
            );
        }
    }
}

fn load_entries(path: &Path) -> Result<BTreeMap<String, String>, StoreError> {
    match fs::read_to_string(path) {
        Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
        Ok(raw) => Ok(serde_json::from_str(&raw)?),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
        Err(err) => Err(err.into()),
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.mutate(|entries| {
            entries.insert(key.to_string(), value.to_string());
        });
    }

    fn remove(&self, key: &str) {
        self.mutate(|entries| {
            entries.remove(key);
        });
    }
}

/// Snapshot of the signed-in principal kept next to the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredUser {
    pub id: ResourceId,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
}

/// Token and user accessors over an injected store.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn detached() -> Self {
        Self::new(Arc::new(DetachedStore))
    }

    pub fn get_token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY)
    }

    pub fn set_token(&self, token: &str) {
        self.store.set(TOKEN_KEY, token);
    }

    pub fn remove_token(&self) {
        self.store.remove(TOKEN_KEY);
    }

    pub fn get_user(&self) -> Option<StoredUser> {
        let raw = self.store.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(err) => {
                tracing::warn!(error = %err, "stored user is not valid JSON");
                None
            }
        }
    }

    pub fn set_user(&self, user: &StoredUser) {
        match serde_json::to_string(user) {
            Ok(raw) => self.store.set(USER_KEY, &raw),
            Err(err) => tracing::warn!(error = %err, "failed to encode user for storage"),
        }
    }

    pub fn remove_user(&self) {
        self.store.remove(USER_KEY);
    }

    /// Forget both the token and the user.
    pub fn clear(&self) {
        self.remove_token();
        self.remove_user();
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("has_token", &self.get_token().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> StoredUser {
        StoredUser {
            id: ResourceId::Int(1),
            email: "a@b.com".to_string(),
            role: Role::Admin,
            is_active: true,
        }
    }

    #[test]
    fn token_set_get_remove() {
        let session = SessionStore::in_memory();
        assert_eq!(session.get_token(), None);

        session.set_token("abc");
        assert_eq!(session.get_token().as_deref(), Some("abc"));

        session.remove_token();
        assert_eq!(session.get_token(), None);
    }

    #[test]
    fn user_roundtrips_through_store() {
        let session = SessionStore::in_memory();
        session.set_user(&user());
        assert_eq!(session.get_user(), Some(user()));

        session.remove_user();
        assert_eq!(session.get_user(), None);
    }

    #[test]
    fn corrupt_user_reads_as_none() {
        let store = Arc::new(MemoryStore::new());
        store.set(USER_KEY, "{not json");
        let session = SessionStore::new(store);
        assert_eq!(session.get_user(), None);
    }

    #[test]
    fn detached_store_ignores_writes() {
        let session = SessionStore::detached();
        session.set_token("abc");
        session.set_user(&user());
        assert_eq!(session.get_token(), None);
        assert_eq!(session.get_user(), None);
        session.clear();
    }

    #[test]
    fn clear_removes_token_and_user() {
        let session = SessionStore::in_memory();
        session.set_token("abc");
        session.set_user(&user());
        session.clear();
        assert_eq!(session.get_token(), None);
        assert_eq!(session.get_user(), None);
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let first = SessionStore::new(Arc::new(FileStore::open(&path)));
        first.set_token("persisted");
        first.set_user(&user());

        let second = SessionStore::new(Arc::new(FileStore::open(&path)));
        assert_eq!(second.get_token().as_deref(), Some("persisted"));
        assert_eq!(second.get_user(), Some(user()));

        second.remove_token();
        let third = FileStore::open(&path);
        assert_eq!(third.get(TOKEN_KEY), None);
        assert!(third.get(USER_KEY).is_some());
    }

    #[test]
    fn corrupt_session_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "[1, 2").unwrap();

        let store = FileStore::open(&path);
        assert_eq!(store.get(TOKEN_KEY), None);

        store.set(TOKEN_KEY, "fresh");
        assert_eq!(FileStore::open(&path).get(TOKEN_KEY).as_deref(), Some("fresh"));
    }

    #[test]
    fn concurrent_writes_leave_file_matching_memory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = FileStore::open(&path);

        std::thread::scope(|scope| {
            for worker in 0..8 {
                let store = &store;
                scope.spawn(move || {
                    for round in 0..25 {
                        store.set(TOKEN_KEY, &format!("{worker}-{round}"));
                        store.set(&format!("worker-{worker}"), &round.to_string());
                    }
                });
            }
        });

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get(TOKEN_KEY), store.get(TOKEN_KEY));
        for worker in 0..8 {
            let key = format!("worker-{worker}");
            assert_eq!(reopened.get(&key).as_deref(), Some("24"));
        }
    }
}
