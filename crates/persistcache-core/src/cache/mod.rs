//! In-process key-value cache with lazy snapshot persistence.
//!
//! This module provides the `CacheManager`, a concurrent map from string keys
//! to values of any serializable type. The full map is written to a single
//! pretty-printed JSON file:
//! - every autosave interval, when something changed since the last flush
//! - once more when the manager is closed
//! - on demand through `save_cache`
//!
//! Reads can return the raw dynamic value or a typed copy (`get_as`).

mod autosave;
pub mod manager;
pub mod snapshot;
pub mod stats;
pub mod store;
mod typed;
pub mod value;

pub use manager::CacheManager;
pub use stats::CacheStats;
pub use store::CacheStore;
pub use value::CachedValue;
