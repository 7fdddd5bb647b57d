//! Watched list
//!
//! The in-memory list is the source of truth. Every mutation computes the
//! next list, writes the whole list to storage and only then commits it, so
//! storage always holds a complete snapshot and a failed write changes nothing.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{WatchedEntry, WatchedStats, MAX_USER_RATING, MIN_USER_RATING};
use crate::storage::{Storage, StorageError};

/// Storage key of the watched list
pub const WATCHED_KEY: &str = "watched";

/// Watched list error types
#[derive(Error, Debug)]
pub enum WatchedError {
    #[error("Movie {0} is already in the watched list")]
    Duplicate(String),

    #[error("Rating {0} is outside 1-10")]
    InvalidRating(u8),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Failed to serialize watched list: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Persisted list of watched movies
pub struct WatchedList {
    storage: Box<dyn Storage>,
    entries: Vec<WatchedEntry>,
}

impl std::fmt::Debug for WatchedList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchedList")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl WatchedList {
    /// Load the list from storage; missing or unreadable data means empty
    pub fn hydrate(storage: Box<dyn Storage>) -> Self {
        let entries = match storage.get(WATCHED_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Vec<WatchedEntry>>(&json) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(error = %e, "stored watched list is unreadable, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "could not read storage, starting with empty watched list");
                Vec::new()
            }
        };

        info!(count = entries.len(), "watched list hydrated");
        Self { storage, entries }
    }

    pub fn entries(&self) -> &[WatchedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&WatchedEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Rating the user gave `id`, if it was watched
    pub fn user_rating_for(&self, id: &str) -> Option<u8> {
        self.get(id).map(|e| e.user_rating)
    }

    /// Derived on every call
    pub fn stats(&self) -> WatchedStats {
        WatchedStats::from_entries(&self.entries)
    }

    /// Append an entry; ids already present are rejected
    pub fn append(&mut self, entry: WatchedEntry) -> Result<&[WatchedEntry], WatchedError> {
        if self.contains(&entry.id) {
            return Err(WatchedError::Duplicate(entry.id));
        }
        if !(MIN_USER_RATING..=MAX_USER_RATING).contains(&entry.user_rating) {
            return Err(WatchedError::InvalidRating(entry.user_rating));
        }

        debug!(id = %entry.id, "adding watched movie");
        let mut next = self.entries.clone();
        next.push(entry);
        self.commit(next)?;
        Ok(&self.entries)
    }

    /// Remove every entry with `id`
    pub fn remove(&mut self, id: &str) -> Result<&[WatchedEntry], WatchedError> {
        let next: Vec<WatchedEntry> = self
            .entries
            .iter()
            .filter(|e| e.id != id)
            .cloned()
            .collect();

        if next.len() == self.entries.len() {
            debug!(%id, "remove: movie not in watched list");
            return Ok(&self.entries);
        }

        debug!(%id, "removing watched movie");
        self.commit(next)?;
        Ok(&self.entries)
    }

    fn commit(&mut self, next: Vec<WatchedEntry>) -> Result<(), WatchedError> {
        let snapshot = serde_json::to_string(&next)?;
        self.storage.set(WATCHED_KEY, snapshot)?;
        self.entries = next;
        Ok(())
    }
}
