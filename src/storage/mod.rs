//! Storage - the key-value store the feedback collection is mirrored to.
//!
//! The store only needs string keys and string values, which is the shape of
//! browser local storage. Writes are synchronous and best-effort from the
//! caller's point of view; the in-memory collection stays authoritative.

mod in_memory;
mod preferences;
pub mod snapshot;

use std::fmt;
use std::sync::Arc;

pub use in_memory::InMemoryKeyValueStore;
pub use preferences::{Preferences, DEFAULT_THEME};

/// String key-value persistence.
///
/// Methods take `&self`; implementations use interior mutability so a store
/// can be shared between the feedback store and preference handling.
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`. Returns None if absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write (or overwrite) the value under `key`.
    fn set(&self, key: &str, value: String) -> Result<(), StorageError>;

    /// Remove `key`. Returns true if it existed.
    fn remove(&self, key: &str) -> Result<bool, StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        (**self).remove(key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The backing store cannot be reached at all.
    Unavailable(String),
    /// Writing would exceed the store's capacity.
    QuotaExceeded {
        key: String,
        needed: usize,
        limit: usize,
    },
    LockPoisoned(&'static str),
    Serde(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unavailable(reason) => write!(f, "storage unavailable: {}", reason),
            StorageError::QuotaExceeded { key, needed, limit } => write!(
                f,
                "storage quota exceeded writing {} ({} bytes needed, limit {})",
                key, needed, limit
            ),
            StorageError::LockPoisoned(operation) => {
                write!(f, "storage lock poisoned during {}", operation)
            }
            StorageError::Serde(msg) => write!(f, "storage serialization error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serde(err.to_string())
    }
}
