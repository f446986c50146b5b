//! persistcache core library.
//!
//! A thread-safe key-value cache that keeps its working set in memory and
//! persists the whole map to a JSON file in the background.
//!
//! ```no_run
//! use persistcache_core::CacheManager;
//!
//! # async fn example() {
//! let cache = CacheManager::open("/tmp/app-cache.json");
//! cache.set("greeting", "hello");
//! assert_eq!(cache.get_string("greeting").as_deref(), Some("hello"));
//! cache.close().await;
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheManager, CacheStats, CacheStore, CachedValue};
pub use config::{default_cache_path, CacheConfig, DEFAULT_AUTOSAVE_INTERVAL};
pub use error::{CacheError, Result};
