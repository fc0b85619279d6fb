//! File-backed document store.

use super::{decode, encode, DocumentStore, StorageResult, SYNC_UPS_DOCUMENT_KEY};
use crate::model::sync_up::SyncUp;
use log::{debug, error};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Stores the collection as pretty-printed JSON in one file.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crash mid-write never leaves a truncated document behind.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<dir>/sync-ups.json`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(SYNC_UPS_DOCUMENT_KEY))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| SYNC_UPS_DOCUMENT_KEY.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl DocumentStore for JsonFileStore {
    fn load(&self) -> StorageResult<Vec<SyncUp>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("event=document_load module=storage status=absent");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };
        decode(&bytes)
    }

    fn save(&self, sync_ups: &[SyncUp]) -> StorageResult<()> {
        let started_at = Instant::now();
        let bytes = encode(sync_ups)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let staging = self.staging_path();
        let result = std::fs::write(&staging, &bytes)
            .and_then(|()| std::fs::rename(&staging, &self.path));
        match result {
            Ok(()) => {
                debug!(
                    "event=document_save module=storage status=ok count={} bytes={} duration_ms={}",
                    sync_ups.len(),
                    bytes.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=document_save module=storage status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                let _ = std::fs::remove_file(&staging);
                Err(err.into())
            }
        }
    }
}
