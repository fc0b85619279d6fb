//! In-memory document store for tests and previews.

use super::{decode, encode, DocumentStore, StorageError, StorageResult};
use crate::model::sync_up::SyncUp;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Keeps the encoded document in memory.
///
/// Holds raw bytes rather than values so malformed documents and encoding can
/// be exercised the same way as with the file store.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    bytes: Mutex<Option<Vec<u8>>>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with an encoded collection.
    pub fn with_sync_ups(sync_ups: &[SyncUp]) -> StorageResult<Self> {
        let store = Self::new();
        store.replace_raw(encode(sync_ups)?);
        Ok(store)
    }

    /// Store pre-seeded with arbitrary bytes.
    pub fn with_raw(bytes: impl Into<Vec<u8>>) -> Self {
        let store = Self::new();
        store.replace_raw(bytes.into());
        store
    }

    /// Makes subsequent writes fail (`true`) or succeed (`false`).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Decodes the currently stored document.
    pub fn stored(&self) -> StorageResult<Vec<SyncUp>> {
        self.load()
    }

    fn replace_raw(&self, bytes: Vec<u8>) {
        let mut guard = match self.bytes.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Some(bytes);
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn load(&self) -> StorageResult<Vec<SyncUp>> {
        let guard = match self.bytes.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match guard.as_deref() {
            Some(bytes) => decode(bytes),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, sync_ups: &[SyncUp]) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Rejected("writes disabled".to_string()));
        }
        self.replace_raw(encode(sync_ups)?);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
