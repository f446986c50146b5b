//! Dynamically typed cache values.
//!
//! Every entry in the cache is a `CachedValue`: a shared handle to any value
//! that can be serialized. Values inserted by the application keep their
//! concrete Rust type, so they can be downcast back without a copy through
//! JSON. Values read back from a snapshot file are held as
//! `serde_json::Value`.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

trait StoredValue: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn to_json(&self) -> serde_json::Result<Value>;
    fn type_name(&self) -> &'static str;
}

impl<T> StoredValue for T
where
    T: Serialize + Send + Sync + 'static,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

#[derive(Clone)]
pub struct CachedValue(Arc<dyn StoredValue>);

impl CachedValue {
    pub fn new<T>(value: T) -> Self
    where
        T: Serialize + Send + Sync + 'static,
    {
        Self(Arc::new(value))
    }

    /// Wrap a decoded JSON value, as produced when loading a snapshot.
    pub fn from_json(value: Value) -> Self {
        Self::new(value)
    }

    /// Borrow the stored value as `T` if that is exactly its type.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        (*self.0).as_any().downcast_ref::<T>()
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }

    /// Name of the concrete type held, for diagnostics
    pub fn type_name(&self) -> &'static str {
        (*self.0).type_name()
    }

    pub fn to_json(&self) -> serde_json::Result<Value> {
        (*self.0).to_json()
    }

    /// Convert through JSON into `T`. This works regardless of the stored
    /// type as long as the JSON shapes are compatible.
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_value(self.to_json()?)
    }

    pub fn as_json(&self) -> Option<&Value> {
        self.downcast_ref::<Value>()
    }

    /// String view of the value without any coercion.
    pub fn as_str(&self) -> Option<&str> {
        if let Some(s) = self.downcast_ref::<String>() {
            return Some(s.as_str());
        }
        if let Some(s) = self.downcast_ref::<&'static str>() {
            return Some(*s);
        }
        self.as_json().and_then(Value::as_str)
    }

    pub fn as_bool(&self) -> Option<bool> {
        if let Some(b) = self.downcast_ref::<bool>() {
            return Some(*b);
        }
        self.as_json().and_then(Value::as_bool)
    }

    /// Integer view. Floats are not truncated; a JSON number only counts when
    /// it is stored as an integer that fits in `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        if let Some(i) = self.downcast_ref::<i64>() {
            return Some(*i);
        }
        if let Some(i) = self.downcast_ref::<i32>() {
            return Some(i64::from(*i));
        }
        self.as_json().and_then(Value::as_i64)
    }
}

impl fmt::Debug for CachedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_json() {
            Ok(json) => f
                .debug_tuple("CachedValue")
                .field(&self.type_name())
                .field(&json)
                .finish(),
            Err(_) => f.debug_tuple("CachedValue").field(&self.type_name()).finish(),
        }
    }
}
