//! Calculation history.
//!
//! The recorder owns a short most-recent-first log of completed calculations
//! and mirrors it into a [`KeyValueStore`] under a single key, as a JSON
//! array of strings. The whole log is rewritten on every change.
//!
//! The in-memory log is authoritative for the running session: a failed
//! write is reported to the caller but never rolls the log back.

mod store;

pub use store::{FileStore, KeyValueStore, MemoryStore};

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::PersistenceError;

/// Storage key the history is kept under.
pub const HISTORY_KEY: &str = "calculatorHistory";

/// Number of entries kept in the log.
pub const MAX_ENTRIES: usize = 5;

/// One completed calculation, e.g. `2+2 = 4` or `√(9) = 3`.
///
/// Entries are opaque display text, not structured records.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryEntry(String);

impl HistoryEntry {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for HistoryEntry {
    fn from(text: String) -> Self {
        Self(text)
    }
}

/// Entries ordered most-recent-first.
pub type HistoryLog = Vec<HistoryEntry>;

/// Owns the history log and its persisted copy.
///
/// All mutations take `&mut self`, so a `record` or `clear` always sees the
/// effect of every call issued before it.
pub struct HistoryRecorder<S> {
    store: S,
    key: String,
    entries: HistoryLog,
}

impl<S: KeyValueStore> HistoryRecorder<S> {
    /// Create a recorder with an empty log. Nothing is read from storage.
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            entries: Vec::new(),
        }
    }

    /// Create a recorder and load the persisted log.
    pub async fn open(store: S, key: impl Into<String>) -> Self {
        let mut recorder = Self::new(store, key);
        recorder.load().await;
        recorder
    }

    /// Replace the in-memory log with the persisted one.
    ///
    /// Missing, unreadable or unparsable storage yields an empty log.
    pub async fn load(&mut self) -> &[HistoryEntry] {
        self.entries = match self.store.get(&self.key).await {
            Ok(Some(raw)) => match parse_log(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(key = %self.key, error = %e, "Discarding unparsable history");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to load history");
                Vec::new()
            }
        };

        debug!(key = %self.key, entries = self.entries.len(), "Loaded history");
        &self.entries
    }

    /// Prepend an entry, drop the oldest beyond the cap, then persist.
    ///
    /// On a persistence error the in-memory log keeps the new entry.
    pub async fn record(&mut self, entry: HistoryEntry) -> Result<(), PersistenceError> {
        info!(entry = %entry, "Recording calculation");

        self.entries.insert(0, entry);
        self.entries.truncate(MAX_ENTRIES);

        self.persist().await
    }

    /// Empty the log and delete the persisted copy.
    ///
    /// The in-memory log is only emptied once storage confirms the delete,
    /// so a failure leaves both sides as they were.
    pub async fn clear(&mut self) -> Result<(), PersistenceError> {
        self.store.remove(&self.key).await?;
        self.entries.clear();

        info!(key = %self.key, "Cleared history");
        Ok(())
    }

    /// Entries, most recent first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    async fn persist(&self) -> Result<(), PersistenceError> {
        let serialized =
            serde_json::to_string(&self.entries).map_err(PersistenceError::Serialize)?;

        self.store.set(&self.key, &serialized).await.inspect_err(|e| {
            warn!(key = %self.key, error = %e, "Failed to persist history");
        })
    }
}

fn parse_log(raw: &str) -> Result<HistoryLog, PersistenceError> {
    let mut entries: HistoryLog =
        serde_json::from_str(raw).map_err(PersistenceError::Deserialize)?;
    entries.truncate(MAX_ENTRIES);
    Ok(entries)
}
