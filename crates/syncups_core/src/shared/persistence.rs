//! Write-behind persistence for the shared collection.
//!
//! # Invariants
//! - Writes are serialized: at most one `DocumentStore::save` runs at a time.
//! - Intermediate revisions may be skipped; the latest committed revision is
//!   always written eventually (last-committed-wins).
//! - A failed write never touches in-memory state; it is logged and recorded
//!   in `WriteStatus`, and the next revision retries with fresh data.

use crate::model::sync_up::SyncUp;
use crate::storage::DocumentStore;
use log::{debug, error};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;

/// Outcome of the most recent completed write.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WriteStatus {
    /// Collection revision the write carried.
    pub revision: u64,
    /// Error message when that write failed.
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
struct Pending {
    revision: u64,
    items: Arc<Vec<SyncUp>>,
}

pub(crate) struct WriteBehind {
    pending: watch::Sender<Pending>,
    status: watch::Receiver<WriteStatus>,
}

impl WriteBehind {
    /// Spawns the writer task on `runtime`. `revision` is the revision of
    /// the already-persisted state; nothing is written until it changes.
    pub(crate) fn spawn(
        store: Arc<dyn DocumentStore>,
        runtime: &Handle,
        revision: u64,
        items: Arc<Vec<SyncUp>>,
    ) -> Self {
        let (pending_tx, pending_rx) = watch::channel(Pending { revision, items });
        let (status_tx, status_rx) = watch::channel(WriteStatus {
            revision,
            error: None,
        });
        runtime.spawn(run_writer(store, pending_rx, status_tx));
        Self {
            pending: pending_tx,
            status: status_rx,
        }
    }

    /// Queues `items` as the newest state to persist.
    pub(crate) fn submit(&self, revision: u64, items: Arc<Vec<SyncUp>>) {
        self.pending.send_replace(Pending { revision, items });
    }

    pub(crate) fn status(&self) -> WriteStatus {
        self.status.borrow().clone()
    }

    /// Resolves once a write carrying `revision` (or newer) has completed.
    pub(crate) async fn wait_for(&self, revision: u64) {
        let mut status = self.status.clone();
        // Err means the writer is gone (runtime shut down); nothing left to wait for.
        let _ = status.wait_for(|current| current.revision >= revision).await;
    }
}

async fn run_writer(
    store: Arc<dyn DocumentStore>,
    mut pending: watch::Receiver<Pending>,
    status: watch::Sender<WriteStatus>,
) {
    while pending.changed().await.is_ok() {
        let next = pending.borrow_and_update().clone();
        let writer_store = Arc::clone(&store);
        let items = Arc::clone(&next.items);
        let outcome = tokio::task::spawn_blocking(move || writer_store.save(&items)).await;

        let error = match outcome {
            Ok(Ok(())) => {
                debug!(
                    "event=persist module=shared status=ok revision={} count={}",
                    next.revision,
                    next.items.len()
                );
                None
            }
            Ok(Err(err)) => {
                error!(
                    "event=persist module=shared status=error revision={} error={}",
                    next.revision, err
                );
                Some(err.to_string())
            }
            Err(join_err) => {
                error!(
                    "event=persist module=shared status=error revision={} error_code=writer_join_failed error={}",
                    next.revision, join_err
                );
                Some(join_err.to_string())
            }
        };

        status.send_replace(WriteStatus {
            revision: next.revision,
            error,
        });
    }
    debug!("event=persist_writer_stop module=shared status=ok");
}
