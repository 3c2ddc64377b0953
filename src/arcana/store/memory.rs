use super::HistoryBackend;
use crate::error::{ArcanaError, Result};
use crate::model::ReadingRecord;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default)]
struct Inner {
    records: Option<Vec<ReadingRecord>>,
    simulate_write_error: bool,
    simulate_read_error: bool,
}

/// In-memory history backend for testing.
///
/// Clones share the same storage, so a test can keep a handle to inspect
/// what the [`HistoryStore`](super::HistoryStore) persisted.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Rc<RefCell<Inner>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<ReadingRecord>) -> Self {
        let store = Self::new();
        store.inner.borrow_mut().records = Some(records);
        store
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.inner.borrow_mut().simulate_write_error = simulate;
    }

    /// Make `load` fail as if the stored history were corrupt.
    pub fn set_simulate_read_error(&self, simulate: bool) {
        self.inner.borrow_mut().simulate_read_error = simulate;
    }
}

impl HistoryBackend for InMemoryStore {
    fn load(&self) -> Result<Option<Vec<ReadingRecord>>> {
        let inner = self.inner.borrow();
        if inner.simulate_read_error {
            return Err(ArcanaError::Store("Simulated read error".to_string()));
        }
        Ok(inner.records.clone())
    }

    fn save(&self, records: &[ReadingRecord]) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        if inner.simulate_write_error {
            return Err(ArcanaError::Store("Simulated write error".to_string()));
        }
        inner.records = Some(records.to_vec());
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        self.inner.borrow_mut().records = None;
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
