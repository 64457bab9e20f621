use std::sync::Mutex;

use crate::{EpochStore, StorageError};

/// An in-memory `EpochStore`, for tests and single-process demos. "Durable"
/// only for the lifetime of the process; a restart loses everything, which
/// is fine for a store that exists purely to exercise the engine's
/// persistence contract without touching a disk.
#[derive(Debug, Default)]
pub struct MemoryEpochStore {
    epoch: Mutex<u64>,
}

impl MemoryEpochStore {
    /// An empty store, as if nothing had ever been persisted.
    pub fn new() -> Self {
        Self::default()
    }
}

impl EpochStore for MemoryEpochStore {
    fn persist(&mut self, epoch: u64) -> Result<(), StorageError> {
        let mut guard = self
            .epoch
            .lock()
            .map_err(|_| StorageError("memory epoch store lock poisoned".into()))?;
        *guard = epoch;
        Ok(())
    }

    fn read(&self) -> Result<u64, StorageError> {
        let guard = self
            .epoch
            .lock()
            .map_err(|_| StorageError("memory epoch store lock poisoned".into()))?;
        Ok(*guard)
    }

    fn validate(&mut self) -> Result<(), StorageError> {
        Ok(())
    }
}
