use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde::{de::DeserializeOwned, Serialize};
use tokio::runtime::Handle;
use tokio::sync::{watch, OnceCell};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::autosave;
use super::stats::CacheStats;
use super::store::CacheStore;
use super::value::CachedValue;
use crate::config::CacheConfig;
use crate::error::Result;

/// A concurrent key-value cache persisted to a JSON snapshot file.
///
/// Writes only touch memory; a background worker flushes the whole map to
/// disk every autosave interval when something changed, and once more on
/// [`close`](Self::close). Without a backing path the manager is a disabled
/// cache on which every operation is a no-op.
pub struct CacheManager {
    store: Arc<CacheStore>,
    shutdown: watch::Sender<bool>,
    worker: Mutex<Option<JoinHandle<()>>>,
    closed: OnceCell<()>,
}

impl CacheManager {
    /// Build a manager, loading any existing snapshot.
    ///
    /// A snapshot that cannot be read is logged and the cache starts empty.
    /// The autosave worker runs on the current Tokio runtime; without one,
    /// changes are only written by explicit saves and by `close`.
    pub fn new(config: CacheConfig) -> Self {
        let store = Arc::new(CacheStore::new(config.backing_path().cloned()));
        let (shutdown, shutdown_rx) = watch::channel(false);

        let mut worker = None;
        if let Some(path) = store.path() {
            if let Err(e) = store.load_cache() {
                warn!(path = %path.display(), error = %e, "Failed to load cache file, starting empty");
            }

            match Handle::try_current() {
                Ok(runtime) => {
                    worker = Some(autosave::spawn(
                        &runtime,
                        Arc::clone(&store),
                        config.autosave_interval,
                        shutdown_rx,
                    ));
                }
                Err(_) => {
                    warn!(path = %path.display(), "No Tokio runtime, autosave disabled");
                }
            }
        }

        Self {
            store,
            shutdown,
            worker: Mutex::new(worker),
            closed: OnceCell::new(),
        }
    }

    /// Open a cache backed by `path` with the default autosave interval.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(CacheConfig::new(path))
    }

    pub fn disabled() -> Self {
        Self::new(CacheConfig::disabled())
    }

    /// Stop the autosave worker after its final flush.
    ///
    /// Safe to call any number of times from any number of tasks: the first
    /// call signals shutdown, and every caller returns once the final flush
    /// has finished.
    pub async fn close(&self) {
        self.closed
            .get_or_init(|| async {
                self.shutdown.send_replace(true);
                let worker = {
                    let mut slot = self.worker.lock().unwrap_or_else(PoisonError::into_inner);
                    slot.take()
                };

                match worker {
                    Some(handle) => {
                        if let Err(e) = handle.await {
                            warn!(error = %e, "Autosave worker ended abnormally");
                        }
                    }
                    None => {
                        if let Err(e) = self.store.save_cache() {
                            debug!(error = %e, "Final flush failed");
                        }
                    }
                }
                debug!("Cache closed");
            })
            .await;
    }

    pub fn is_closed(&self) -> bool {
        self.closed.initialized()
    }

    // ===== Store =====

    pub fn set<T>(&self, key: impl Into<String>, value: T)
    where
        T: Serialize + Send + Sync + 'static,
    {
        self.store.set(key, value)
    }

    pub fn del(&self, key: &str) {
        self.store.del(key)
    }

    pub fn get(&self, key: &str) -> Option<CachedValue> {
        self.store.get(key)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.clear()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.store.contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.store.keys()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.store.is_dirty()
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_enabled()
    }

    pub fn path(&self) -> Option<&Path> {
        self.store.path()
    }

    pub fn stats(&self) -> CacheStats {
        self.store.stats()
    }

    // ===== Typed access =====

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.store.get_string(key)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.store.get_bool(key)
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.store.get_int(key)
    }

    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned + Clone + 'static,
    {
        self.store.get_as(key)
    }

    pub fn get_into<T>(&self, key: &str, dest: &mut T) -> bool
    where
        T: DeserializeOwned + Clone + 'static,
    {
        self.store.get_into(key, dest)
    }

    // ===== Persistence =====

    pub fn load_cache(&self) -> Result<()> {
        self.store.load_cache()
    }

    pub fn save_cache(&self) -> Result<()> {
        self.store.save_cache()
    }
}

impl Drop for CacheManager {
    fn drop(&mut self) {
        if !self.is_closed() && self.store.is_enabled() {
            // The worker still runs its final flush, nobody waits for it.
            debug!("Cache dropped without close");
            self.shutdown.send_replace(true);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
