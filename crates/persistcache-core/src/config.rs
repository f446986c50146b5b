//! Cache configuration.
//!
//! A `CacheConfig` names the snapshot file and the autosave interval. A
//! config without a path produces a disabled cache: every operation becomes
//! a no-op and nothing touches the disk.

use std::path::PathBuf;
use std::time::Duration;

/// Snapshot file name used by [`default_cache_path`]
const CACHE_FILE: &str = "cache.json";

/// Interval between background flushes.
pub const DEFAULT_AUTOSAVE_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    pub path: Option<PathBuf>,
    pub autosave_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: None,
            autosave_interval: DEFAULT_AUTOSAVE_INTERVAL,
        }
    }
}

impl CacheConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::default().with_path(path)
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_autosave_interval(mut self, interval: Duration) -> Self {
        self.autosave_interval = interval;
        self
    }

    /// The backing path, if persistence is enabled. An empty path counts as
    /// no path.
    pub fn backing_path(&self) -> Option<&PathBuf> {
        self.path
            .as_ref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    pub fn is_enabled(&self) -> bool {
        self.backing_path().is_some()
    }
}

/// Default snapshot location for an application:
/// `<platform cache dir>/<app_name>/cache.json`.
pub fn default_cache_path(app_name: &str) -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join(app_name).join(CACHE_FILE))
}
