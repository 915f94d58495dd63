//! Persistent record storage.

mod sheet;

pub use sheet::CsvStore;

use std::sync::Mutex;

use crate::error::StoreError;
use crate::models::record::ResumeRecord;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Trait for the table that holds processed resumes.
pub trait RecordStore {
    /// Load all records. `Ok(None)` means the store does not exist yet.
    fn load(&self) -> Result<Option<Vec<ResumeRecord>>>;

    /// Replace the stored table with `records`.
    fn save(&self, records: &[ResumeRecord]) -> Result<()>;
}

/// In-memory store, mostly for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Option<Vec<ResumeRecord>>>,
}

impl MemoryStore {
    /// An empty store that has never been saved.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `records`.
    pub fn with_records(records: Vec<ResumeRecord>) -> Self {
        Self {
            records: Mutex::new(Some(records)),
        }
    }

    /// Current contents.
    pub fn snapshot(&self) -> Option<Vec<ResumeRecord>> {
        self.records.lock().ok().and_then(|r| r.clone())
    }
}

impl RecordStore for MemoryStore {
    fn load(&self) -> Result<Option<Vec<ResumeRecord>>> {
        self.records
            .lock()
            .map(|r| r.clone())
            .map_err(|_| StoreError::Corrupt("memory store lock poisoned".to_string()))
    }

    fn save(&self, records: &[ResumeRecord]) -> Result<()> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| StoreError::Corrupt("memory store lock poisoned".to_string()))?;
        *guard = Some(records.to_vec());
        Ok(())
    }
}
