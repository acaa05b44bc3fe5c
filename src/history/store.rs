//! Recent-files history
//!
//! Most-recently-accessed first, no two entries path-equal, at most
//! `MAX_HISTORY_ITEMS` long. Only this type writes the history key.

use std::path::Path;

use super::state::GlobalState;
use crate::consts::{HISTORY_KEY, MAX_HISTORY_ITEMS};
use crate::core::{HistoryEntry, path_equal};
use crate::error::PersistenceError;

pub(crate) struct HistoryStore {
    state: GlobalState,
    entries: Vec<HistoryEntry>,
    max_items: usize,
}

impl HistoryStore {
    /// Decode the history key up front so a malformed value is reported
    /// instead of being overwritten by the next access
    pub(crate) fn open(state: GlobalState) -> Result<Self, PersistenceError> {
        let entries = state.get(HISTORY_KEY)?.unwrap_or_default();
        Ok(Self {
            state,
            entries,
            max_items: MAX_HISTORY_ITEMS,
        })
    }

    pub(crate) fn state_path(&self) -> &Path {
        self.state.path()
    }

    /// Snapshot of the persisted history
    pub(crate) fn get_all(&self) -> Vec<HistoryEntry> {
        self.entries.clone()
    }

    /// Move `path` to the front (inserting it if new), truncate and persist
    pub(crate) fn record_access(&mut self, path: &str) -> Result<Vec<HistoryEntry>, PersistenceError> {
        let mut entries = self.get_all();
        entries.retain(|e| !path_equal(&e.file_path, path));
        entries.insert(0, HistoryEntry::now(path));
        entries.truncate(self.max_items);
        self.state.update(HISTORY_KEY, &entries)?;
        tracing::debug!(path, len = entries.len(), "history bumped");
        self.entries.clone_from(&entries);
        Ok(entries)
    }

    /// Drop every entry path-equal to `path`; absent paths are a no-op
    pub(crate) fn remove(&mut self, path: &str) -> Result<Vec<HistoryEntry>, PersistenceError> {
        let mut entries = self.get_all();
        let before = entries.len();
        entries.retain(|e| !path_equal(&e.file_path, path));
        if entries.len() == before {
            return Ok(entries);
        }
        self.state.update(HISTORY_KEY, &entries)?;
        tracing::debug!(path, removed = before - entries.len(), "history entry removed");
        self.entries.clone_from(&entries);
        Ok(entries)
    }
}
