//! services/api/src/adapters/storage.rs
//!
//! This module contains the durable storage adapters, the concrete
//! implementations of the `KeyValueStore` port from the `core` crate.
//! `FileStore` keeps one UTF-8 text file per key under a data directory;
//! `MemoryStore` backs tests and ephemeral deployments.

use async_trait::async_trait;
use draftdesk_core::ports::{KeyValueStore, PortError, PortResult};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

//=========================================================================================
// FileStore
//=========================================================================================

/// A file-backed store that implements the `KeyValueStore` port.
#[derive(Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a new `FileStore` rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Ensures the data directory exists. Called once at startup.
    pub async fn init(&self) -> PortResult<()> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| PortError::Storage(e.to_string()))
    }

    /// Maps a logical key to its backing file. Keys with path separators are
    /// rejected so a malformed key cannot escape the data directory.
    fn path_for(&self, key: &str) -> PortResult<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.contains("..") {
            return Err(PortError::Storage(format!("invalid storage key: '{}'", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> PortResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PortError::Storage(e.to_string())),
        }
    }

    async fn set(&self, key: &str, value: &str) -> PortResult<()> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            ensure_dir(parent).await?;
        }
        fs::write(&path, value)
            .await
            .map_err(|e| PortError::Storage(e.to_string()))
    }

    async fn remove(&self, key: &str) -> PortResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            // Removing an absent key is a valid no-op.
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PortError::Storage(e.to_string())),
        }
    }
}

async fn ensure_dir(dir: &Path) -> PortResult<()> {
    fs::create_dir_all(dir)
        .await
        .map_err(|e| PortError::Storage(e.to_string()))
}

//=========================================================================================
// MemoryStore
//=========================================================================================

/// An in-memory store with the same contract as `FileStore`.
#[derive(Default)]
pub struct MemoryStore {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> PortResult<Option<String>> {
        Ok(self.map.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> PortResult<()> {
        self.map
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> PortResult<()> {
        self.map.lock().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_store_round_trips_a_key() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path());
        store.init().await.unwrap();

        assert_eq!(store.get("user").await.unwrap(), None);
        store.set("user", "{\"id\":\"user-1\"}").await.unwrap();
        assert_eq!(
            store.get("user").await.unwrap().as_deref(),
            Some("{\"id\":\"user-1\"}")
        );

        store.remove("user").await.unwrap();
        assert_eq!(store.get("user").await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_store_remove_of_absent_key_is_a_noop() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path());
        store.init().await.unwrap();
        store.remove("never-written").await.unwrap();
    }

    #[tokio::test]
    async fn file_store_rejects_path_traversal_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path());
        store.init().await.unwrap();
        assert!(store.get("../etc/passwd").await.is_err());
        assert!(store.set("a/b", "x").await.is_err());
    }

    #[tokio::test]
    async fn memory_store_round_trips_a_key() {
        let store = MemoryStore::new();
        store.set("drafts_user-1", "[]").await.unwrap();
        assert_eq!(
            store.get("drafts_user-1").await.unwrap().as_deref(),
            Some("[]")
        );
        store.remove("drafts_user-1").await.unwrap();
        assert_eq!(store.get("drafts_user-1").await.unwrap(), None);
    }
}
