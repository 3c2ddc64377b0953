//! # Storage Layer
//!
//! Reading history is a single ordered list of [`ReadingRecord`]s, newest
//! first. Two pieces cooperate:
//!
//! - [`HistoryBackend`]: raw persistence of the whole list (load, save,
//!   remove). It knows nothing about ordering rules.
//! - [`HistoryStore`]: the in-memory list plus the rules around it: new
//!   records go to the front, every save rewrites the whole list, and a
//!   missing or unreadable history is treated as empty.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: production storage, `history.json` in the data dir.
//!   Writes go to a temp file that is renamed over the target, so a reader
//!   sees either the old list or the new one.
//! - [`memory::InMemoryStore`]: for tests, with simulated write failures.
//!
//! ## Save Policy
//!
//! `save` persists the new list first and only then updates memory. If the
//! write fails the caller gets the error and the in-memory history still
//! matches what is on disk.

use crate::error::Result;
use crate::model::ReadingRecord;

pub mod fs;
pub mod memory;

/// Raw persistence for the history list.
pub trait HistoryBackend {
    /// Load the persisted list. `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<Vec<ReadingRecord>>>;

    /// Replace the persisted list.
    fn save(&self, records: &[ReadingRecord]) -> Result<()>;

    /// Delete the persisted list. Must succeed if it is already gone.
    fn remove(&self) -> Result<()>;

    /// Human-readable location, for messages.
    fn location(&self) -> String;
}

pub struct HistoryStore<B: HistoryBackend> {
    backend: B,
    records: Vec<ReadingRecord>,
    load_warning: Option<String>,
}

impl<B: HistoryBackend> HistoryStore<B> {
    /// Loads history from `backend`. Never fails: unreadable history becomes
    /// an empty list and a warning.
    pub fn open(backend: B) -> Self {
        let (records, load_warning) = match backend.load() {
            Ok(Some(records)) => {
                tracing::debug!(count = records.len(), location = %backend.location(), "history loaded");
                (records, None)
            }
            Ok(None) => (Vec::new(), None),
            Err(e) => {
                let warning = format!(
                    "Could not read history at {}: {}. Starting with an empty history.",
                    backend.location(),
                    e
                );
                tracing::warn!("{}", warning);
                (Vec::new(), Some(warning))
            }
        };

        Self {
            backend,
            records,
            load_warning,
        }
    }

    /// Inserts `record` as the newest entry.
    pub fn save(&mut self, record: ReadingRecord) -> Result<()> {
        let mut updated = Vec::with_capacity(self.records.len() + 1);
        updated.push(record);
        updated.extend(self.records.iter().cloned());

        self.backend.save(&updated)?;
        self.records = updated;
        tracing::info!(count = self.records.len(), "reading saved");
        Ok(())
    }

    /// Empties history and deletes the backing storage.
    pub fn clear(&mut self) -> Result<()> {
        self.backend.remove()?;
        self.records.clear();
        self.load_warning = None;
        tracing::info!("history cleared");
        Ok(())
    }

    pub fn records(&self) -> &[ReadingRecord] {
        &self.records
    }

    /// Record at a 1-based display index (1 is the newest).
    pub fn get(&self, index: usize) -> Option<&ReadingRecord> {
        index.checked_sub(1).and_then(|i| self.records.get(i))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn load_warning(&self) -> Option<&str> {
        self.load_warning.as_deref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}
