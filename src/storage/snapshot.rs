//! Snapshot codec for the persisted collection: one JSON array under one key.

use std::collections::HashSet;

use crate::entry::FeedbackEntry;

use super::{KeyValueStore, StorageError};

pub fn encode_entries(entries: &[FeedbackEntry]) -> Result<String, StorageError> {
    Ok(serde_json::to_string(entries)?)
}

/// Parse a stored array. If an id repeats, the first occurrence wins.
pub fn decode_entries(raw: &str) -> Result<Vec<FeedbackEntry>, StorageError> {
    let entries: Vec<FeedbackEntry> = serde_json::from_str(raw)?;

    let mut seen = HashSet::with_capacity(entries.len());
    let before = entries.len();
    let entries: Vec<FeedbackEntry> = entries
        .into_iter()
        .filter(|entry| seen.insert(entry.id))
        .collect();

    if entries.len() != before {
        tracing::warn!(
            dropped = before - entries.len(),
            "snapshot contained duplicate entry ids"
        );
    }

    Ok(entries)
}

/// Read the collection under `key`. An absent key, an unreadable store, or a
/// malformed value all yield an empty collection.
pub fn load_entries<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Vec<FeedbackEntry> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            tracing::warn!(key, error = %err, "could not read feedback snapshot");
            return Vec::new();
        }
    };

    match decode_entries(&raw) {
        Ok(entries) => {
            tracing::debug!(key, count = entries.len(), "loaded feedback snapshot");
            entries
        }
        Err(err) => {
            tracing::warn!(key, error = %err, "discarding unreadable feedback snapshot");
            Vec::new()
        }
    }
}

pub fn save_entries<S: KeyValueStore + ?Sized>(
    store: &S,
    key: &str,
    entries: &[FeedbackEntry],
) -> Result<(), StorageError> {
    store.set(key, encode_entries(entries)?)
}
