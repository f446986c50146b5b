//! Typed retrieval on top of the dynamic store.
//!
//! `get_string`, `get_bool` and `get_int` only succeed when the stored value
//! already has that type. `get_as` first tries a plain downcast and, failing
//! that, converts through JSON, which is what values loaded from a snapshot
//! need since they come back as generic JSON.

use serde::de::DeserializeOwned;
use tracing::debug;

use super::store::CacheStore;

impl CacheStore {
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get(key)?.as_str().map(str::to_owned)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key)?.as_bool()
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key)?.as_i64()
    }

    /// Fetch `key` as a `T`.
    ///
    /// Returns `None` when the key is absent or the value cannot be turned
    /// into a `T`. Conversion happens after the read lock is released.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned + Clone + 'static,
    {
        let raw = self.get(key)?;

        if let Some(value) = raw.downcast_ref::<T>() {
            return Some(value.clone());
        }

        let wanted = std::any::type_name::<T>();
        let json = match raw.to_json() {
            Ok(json) => json,
            Err(e) => {
                debug!(key, stored = raw.type_name(), wanted, error = %e, "get_as encode failed");
                return None;
            }
        };

        match serde_json::from_value(json) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(key, stored = raw.type_name(), wanted, error = %e, "get_as decode failed");
                None
            }
        }
    }

    /// Like [`get_as`](Self::get_as) but writes into `dest`. `dest` is left
    /// untouched when nothing usable is found.
    pub fn get_into<T>(&self, key: &str, dest: &mut T) -> bool
    where
        T: DeserializeOwned + Clone + 'static,
    {
        match self.get_as(key) {
            Some(value) => {
                *dest = value;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use serde_json::json;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct User {
        name: String,
        age: u32,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Profile {
        user: User,
        tags: Vec<String>,
        scores: HashMap<String, f64>,
        nickname: Option<String>,
    }

    fn sample_profile() -> Profile {
        let mut scores = HashMap::new();
        scores.insert("math".to_string(), 91.5);
        Profile {
            user: User {
                name: "Alice".to_string(),
                age: 30,
            },
            tags: vec!["admin".to_string(), "beta".to_string()],
            scores,
            nickname: None,
        }
    }

    #[test]
    fn test_fixed_type_accessors() {
        let dir = tempdir().unwrap();
        let store = CacheStore::new(Some(dir.path().join("cache.json")));
        store.set("s", "text");
        store.set("b", true);
        store.set("i", 42i64);
        store.set("f", 1.5f64);

        assert_eq!(store.get_string("s"), Some("text".to_string()));
        assert_eq!(store.get_bool("b"), Some(true));
        assert_eq!(store.get_int("i"), Some(42));

        // Mismatched types are reported as absent, never coerced.
        assert_eq!(store.get_string("i"), None);
        assert_eq!(store.get_bool("s"), None);
        assert_eq!(store.get_int("f"), None);
        assert_eq!(store.get_int("missing"), None);
    }

    #[test]
    fn test_get_as_fast_path() {
        let dir = tempdir().unwrap();
        let store = CacheStore::new(Some(dir.path().join("cache.json")));
        store.set("user", User { name: "Alice".to_string(), age: 30 });

        let user: User = store.get_as("user").unwrap();
        assert_eq!(user, User { name: "Alice".to_string(), age: 30 });

        store.set("str_key", "hello".to_string());
        assert_eq!(store.get_as::<String>("str_key"), Some("hello".to_string()));
    }

    #[test]
    fn test_get_as_converts_between_types() {
        let dir = tempdir().unwrap();
        let store = CacheStore::new(Some(dir.path().join("cache.json")));
        store.set("raw", json!({"name": "Bob", "age": 40}));
        store.set("literal", "hello");

        let user: User = store.get_as("raw").unwrap();
        assert_eq!(user, User { name: "Bob".to_string(), age: 40 });

        // A &'static str reaches a String through the fallback path.
        assert_eq!(store.get_as::<String>("literal"), Some("hello".to_string()));
    }

    #[test]
    fn test_get_as_shape_mismatch_is_none() {
        let dir = tempdir().unwrap();
        let store = CacheStore::new(Some(dir.path().join("cache.json")));
        store.set("number", 5i64);
        store.set("partial", json!({"name": "Carol"}));

        assert!(store.get_as::<User>("number").is_none());
        assert!(store.get_as::<User>("partial").is_none());
        assert!(store.get_as::<User>("missing").is_none());
    }

    #[test]
    fn test_get_into_leaves_dest_on_failure() {
        let dir = tempdir().unwrap();
        let store = CacheStore::new(Some(dir.path().join("cache.json")));
        store.set("user", User { name: "Dan".to_string(), age: 22 });

        let mut dest = User { name: "placeholder".to_string(), age: 0 };
        assert!(!store.get_into("missing", &mut dest));
        assert_eq!(dest.name, "placeholder");

        assert!(store.get_into("user", &mut dest));
        assert_eq!(dest, User { name: "Dan".to_string(), age: 22 });
    }

    #[test]
    fn test_get_as_paths_agree_after_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let profile = sample_profile();

        let store = CacheStore::new(Some(path.clone()));
        store.set("profile", profile.clone());
        let fast: Profile = store.get_as("profile").unwrap();
        store.save_cache().unwrap();

        let reloaded = CacheStore::new(Some(path));
        reloaded.load_cache().unwrap();
        assert!(reloaded.get("profile").unwrap().as_json().is_some());
        let fallback: Profile = reloaded.get_as("profile").unwrap();

        assert_eq!(fast, profile);
        assert_eq!(fallback, fast);
    }

    #[test]
    fn test_disabled_typed_accessors() {
        let store = CacheStore::new(None);
        store.set("user", User { name: "Eve".to_string(), age: 1 });
        assert!(store.get_as::<User>("user").is_none());
        assert!(store.get_string("user").is_none());
    }
}
