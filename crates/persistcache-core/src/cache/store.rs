use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use super::snapshot::{self, Document};
use super::stats::CacheStats;
use super::value::CachedValue;
use crate::error::{CacheError, Result};

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, CachedValue>,
    /// Set on every mutation, cleared by a successful flush or a clear
    dirty: bool,
    last_flush: Option<DateTime<Utc>>,
}

/// The shared in-memory map plus its persistence operations.
///
/// Without a backing path the store is disabled: mutations are dropped,
/// lookups find nothing and persistence calls succeed without touching the
/// disk.
pub struct CacheStore {
    path: Option<PathBuf>,
    state: RwLock<CacheState>,
}

impl CacheStore {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path: path.filter(|p| !p.as_os_str().is_empty()),
            state: RwLock::new(CacheState::default()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_enabled(&self) -> bool {
        self.path.is_some()
    }

    // The guarded state stays consistent between statements, so a panic in
    // another holder does not invalidate it.
    fn read(&self) -> RwLockReadGuard<'_, CacheState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CacheState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ===== Mutation =====

    pub fn set<T>(&self, key: impl Into<String>, value: T)
    where
        T: Serialize + Send + Sync + 'static,
    {
        if !self.is_enabled() {
            return;
        }
        let mut state = self.write();
        state.entries.insert(key.into(), CachedValue::new(value));
        state.dirty = true;
    }

    /// Remove `key`. The store is marked dirty even if the key was absent.
    pub fn del(&self, key: &str) {
        if !self.is_enabled() {
            return;
        }
        let mut state = self.write();
        state.entries.remove(key);
        state.dirty = true;
    }

    /// Empty the store and delete the snapshot file.
    ///
    /// Memory is cleared even when the file cannot be removed. The dirty flag
    /// is reset only once both sides are empty.
    pub fn clear(&self) -> Result<()> {
        let Some(path) = self.path() else {
            return Ok(());
        };
        let mut state = self.write();
        state.entries.clear();

        if snapshot::remove_document(path)? {
            debug!(path = %path.display(), "Removed cache file");
        }

        state.dirty = false;
        Ok(())
    }

    // ===== Lookup =====

    pub fn get(&self, key: &str) -> Option<CachedValue> {
        if !self.is_enabled() {
            return None;
        }
        self.read().entries.get(key).cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.is_enabled() && self.read().entries.contains_key(key)
    }

    /// All keys, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.read().entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_dirty(&self) -> bool {
        self.read().dirty
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.read();
        CacheStats {
            enabled: self.is_enabled(),
            path: self.path.clone(),
            entries: state.entries.len(),
            dirty: state.dirty,
            last_flush: state.last_flush,
        }
    }

    // ===== Persistence =====

    /// Merge the snapshot file into memory. Keys from the file replace
    /// in-memory entries of the same name. A missing file loads nothing.
    pub fn load_cache(&self) -> Result<()> {
        let Some(path) = self.path() else {
            return Ok(());
        };
        let mut state = self.write();

        let Some(document) = snapshot::load_document(path)? else {
            debug!(path = %path.display(), "No cache file, starting empty");
            return Ok(());
        };

        let count = document.len();
        for (key, value) in document {
            state.entries.insert(key, CachedValue::from_json(value));
        }
        debug!(path = %path.display(), entries = count, "Loaded cache file");
        Ok(())
    }

    /// Write the whole map to disk if anything changed since the last flush.
    /// On failure the store stays dirty so the next flush retries.
    pub fn save_cache(&self) -> Result<()> {
        let Some(path) = self.path() else {
            return Ok(());
        };
        let mut state = self.write();

        if !state.dirty {
            return Ok(());
        }

        let document = encode_entries(&state.entries)?;
        snapshot::save_document(path, &document)?;

        state.dirty = false;
        state.last_flush = Some(Utc::now());
        debug!(path = %path.display(), entries = document.len(), "Flushed cache file");
        Ok(())
    }
}

fn encode_entries(entries: &HashMap<String, CachedValue>) -> Result<Document> {
    let mut document = Document::new();
    for (key, value) in entries {
        let json = value.to_json().map_err(|e| CacheError::Encode {
            key: key.clone(),
            source: e,
        })?;
        document.insert(key.clone(), json);
    }
    Ok(document)
}
