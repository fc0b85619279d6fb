//! Durable single-document persistence for the sync-ups collection.
//!
//! # Responsibility
//! - Define the `DocumentStore` contract (whole-document load/save).
//! - Provide file-backed and in-memory implementations.
//! - Resolve the document location from process configuration.
//!
//! # Invariants
//! - The whole collection is read and written as one unit under a fixed key.
//! - An absent document loads as an empty collection.
//! - Malformed documents surface as `StorageError::Malformed`; callers decide
//!   whether to fall back (the shared cell always does).

use crate::model::sync_up::SyncUp;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryDocumentStore;

/// Fixed storage identifier of the sync-ups document.
pub const SYNC_UPS_DOCUMENT_KEY: &str = "sync-ups.json";

/// Environment variable overriding the document location.
pub const DOCUMENT_PATH_ENV: &str = "SYNCUPS_DOCUMENT_PATH";

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug)]
pub enum StorageError {
    /// Reading or writing the backing medium failed.
    Io(std::io::Error),
    /// Stored bytes are not a valid sync-ups document.
    Malformed(serde_json::Error),
    /// The in-memory collection could not be encoded.
    Serialize(serde_json::Error),
    /// A write was refused by the store (test stores only).
    Rejected(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "document io failed: {err}"),
            Self::Malformed(err) => write!(f, "malformed sync-ups document: {err}"),
            Self::Serialize(err) => write!(f, "failed to encode sync-ups document: {err}"),
            Self::Rejected(reason) => write!(f, "document write rejected: {reason}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Malformed(err) | Self::Serialize(err) => Some(err),
            Self::Rejected(_) => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Whole-document persistence of the sync-ups collection.
pub trait DocumentStore: Send + Sync {
    /// Reads the stored collection; `Ok(vec![])` when nothing is stored yet.
    fn load(&self) -> StorageResult<Vec<SyncUp>>;

    /// Replaces the stored collection with `sync_ups`.
    fn save(&self, sync_ups: &[SyncUp]) -> StorageResult<()>;
}

/// Resolves the document path: `SYNCUPS_DOCUMENT_PATH` when set and non-blank,
/// otherwise `<temp dir>/sync-ups.json`.
pub fn resolve_document_path() -> PathBuf {
    if let Ok(raw) = std::env::var(DOCUMENT_PATH_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(SYNC_UPS_DOCUMENT_KEY)
}

fn decode(bytes: &[u8]) -> StorageResult<Vec<SyncUp>> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    serde_json::from_slice(bytes).map_err(StorageError::Malformed)
}

fn encode(sync_ups: &[SyncUp]) -> StorageResult<Vec<u8>> {
    serde_json::to_vec_pretty(sync_ups).map_err(StorageError::Serialize)
}

#[cfg(test)]
mod tests {
    use super::{decode, StorageError};

    #[test]
    fn blank_document_decodes_as_empty() {
        assert!(decode(b"  \n").expect("blank should decode").is_empty());
    }

    #[test]
    fn garbage_is_reported_as_malformed() {
        let err = decode(b"{not json").expect_err("garbage must fail");
        assert!(matches!(err, StorageError::Malformed(_)));
    }
}
