use serde::{Deserialize, Serialize};

use crate::{EpochStore, StorageError};

const EPOCH_KEY: &[u8] = b"election/epoch";
/// Written alongside the epoch and checked back on every `validate`, so a
/// store that opens but silently returns garbage (wrong DB, truncated
/// record) is caught rather than treated as "never persisted".
const MAGIC: u32 = 0x656c6374; // "elct"

#[derive(Serialize, Deserialize)]
struct EpochRecord {
    magic: u32,
    epoch: u64,
}

/// A RocksDB-backed `EpochStore`. Writes go through RocksDB's own WAL
/// before `persist` returns, satisfying the synchronous-durability
/// contract `Owner::persist_epoch` needs.
pub struct PersistentEpochStore {
    db: rocksdb::DB,
}

impl PersistentEpochStore {
    /// Opens (creating if necessary) a RocksDB database at `path` to back
    /// the epoch record.
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, StorageError> {
        let mut opts = rocksdb::Options::default();
        opts.create_if_missing(true);
        let db = rocksdb::DB::open(&opts, path)
            .map_err(|e| StorageError(format!("failed to open rocksdb: {e}")))?;
        Ok(Self { db })
    }

    fn write_options() -> rocksdb::WriteOptions {
        let mut opts = rocksdb::WriteOptions::default();
        opts.set_sync(true);
        opts
    }
}

impl EpochStore for PersistentEpochStore {
    fn persist(&mut self, epoch: u64) -> Result<(), StorageError> {
        let record = EpochRecord { magic: MAGIC, epoch };
        let bytes = bincode::serialize(&record)
            .map_err(|e| StorageError(format!("failed to encode epoch record: {e}")))?;
        self.db
            .put_opt(EPOCH_KEY, bytes, &Self::write_options())
            .map_err(|e| StorageError(format!("failed to persist epoch: {e}")))
    }

    fn read(&self) -> Result<u64, StorageError> {
        match self
            .db
            .get(EPOCH_KEY)
            .map_err(|e| StorageError(format!("failed to read epoch: {e}")))?
        {
            None => Ok(0),
            Some(bytes) => {
                let record: EpochRecord = bincode::deserialize(&bytes).map_err(|e| {
                    StorageError(format!("failed to decode epoch record: {e}"))
                })?;
                if record.magic != MAGIC {
                    return Err(StorageError("epoch record magic mismatch".into()));
                }
                Ok(record.epoch)
            }
        }
    }

    fn validate(&mut self) -> Result<(), StorageError> {
        let current = self.read()?;
        self.persist(current)
    }
}
