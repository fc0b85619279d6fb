//! Process-wide, observable, persisted sync-ups collection.
//!
//! # Responsibility
//! - Hold the one canonical in-memory copy of every sync-up.
//! - Notify observers after every committed mutation.
//! - Feed committed revisions to the write-behind persistence task.
//! - Hand out [`SyncUpRef`] handles scoped to one element by identity.
//!
//! # Invariants
//! - Elements are unique by id and keep insertion order.
//! - Every clone of a `SharedSyncUps` reads and writes the same storage.
//! - Revisions increase by one per committed mutation; no-op mutations do not
//!   bump the revision, notify, or persist.
//! - Observers run after the internal lock is released, so they may read or
//!   mutate the collection themselves.
//! - Every notification carries the revision it was committed at. Writers on
//!   different threads may deliver out of order; observers that keep state
//!   subscribe through [`SharedSyncUps::subscribe_revisions`] and drop
//!   snapshots older than the last one they saw.

mod element;
mod persistence;

pub use element::SyncUpRef;
pub use persistence::WriteStatus;

use crate::model::sync_up::{SyncUp, SyncUpId};
use crate::storage::DocumentStore;
use log::{info, warn};
use persistence::WriteBehind;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tokio::runtime::Handle;

type Observer = Arc<dyn Fn(u64, &[SyncUp]) + Send + Sync>;

struct Cell {
    items: Vec<SyncUp>,
    revision: u64,
    observers: BTreeMap<u64, Observer>,
    next_observer_id: u64,
}

struct Inner {
    cell: Mutex<Cell>,
    writer: Option<WriteBehind>,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, Cell> {
        match self.cell.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Live handle to the shared sync-ups collection.
#[derive(Clone)]
pub struct SharedSyncUps {
    inner: Arc<Inner>,
}

/// Keeps an observer registered; dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    inner: Weak<Inner>,
    id: u64,
}

impl Subscription {
    /// Explicitly removes the observer. Same as dropping the handle.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.lock().observers.remove(&self.id);
        }
    }
}

impl SharedSyncUps {
    /// Non-persisted collection, used by tests and previews.
    pub fn in_memory(items: Vec<SyncUp>) -> Self {
        Self::build(dedupe(items), None)
    }

    /// Loads the collection from `store` and persists every later mutation
    /// through a writer task spawned on `runtime`.
    ///
    /// Unreadable or malformed documents load as an empty collection.
    pub fn load(store: Arc<dyn DocumentStore>, runtime: &Handle) -> Self {
        let items = match store.load() {
            Ok(items) => {
                info!(
                    "event=shared_load module=shared status=ok count={}",
                    items.len()
                );
                dedupe(items)
            }
            Err(err) => {
                warn!(
                    "event=shared_load module=shared status=fallback_empty error={}",
                    err
                );
                Vec::new()
            }
        };
        let writer = WriteBehind::spawn(store, runtime, 0, Arc::new(items.clone()));
        Self::build(items, Some(writer))
    }

    fn build(items: Vec<SyncUp>, writer: Option<WriteBehind>) -> Self {
        Self {
            inner: Arc::new(Inner {
                cell: Mutex::new(Cell {
                    items,
                    revision: 0,
                    observers: BTreeMap::new(),
                    next_observer_id: 0,
                }),
                writer,
            }),
        }
    }

    /// Snapshot of the whole collection.
    pub fn get(&self) -> Vec<SyncUp> {
        self.inner.lock().items.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().items.is_empty()
    }

    /// Current revision; bumped by every committed mutation.
    pub fn revision(&self) -> u64 {
        self.inner.lock().revision
    }

    pub fn find(&self, id: SyncUpId) -> Option<SyncUp> {
        self.inner
            .lock()
            .items
            .iter()
            .find(|sync_up| sync_up.id == id)
            .cloned()
    }

    pub fn contains(&self, id: SyncUpId) -> bool {
        self.inner.lock().items.iter().any(|sync_up| sync_up.id == id)
    }

    /// Replaces the whole collection. Duplicate ids keep their first entry.
    pub fn set(&self, items: Vec<SyncUp>) {
        let items = dedupe(items);
        self.mutate(move |current| {
            if *current == items {
                return ((), false);
            }
            *current = items;
            ((), true)
        });
    }

    /// Appends at the tail; returns `false` when the id is already present.
    pub fn append(&self, sync_up: SyncUp) -> bool {
        self.mutate(move |current| {
            if current.iter().any(|existing| existing.id == sync_up.id) {
                return (false, false);
            }
            current.push(sync_up);
            (true, true)
        })
    }

    /// Removes the elements at `offsets`; out-of-range offsets are ignored.
    pub fn remove_at(&self, offsets: &BTreeSet<usize>) -> Vec<SyncUp> {
        self.mutate(|current| {
            let mut removed = Vec::new();
            for &offset in offsets.iter().rev() {
                if offset < current.len() {
                    removed.push(current.remove(offset));
                }
            }
            removed.reverse();
            let changed = !removed.is_empty();
            (removed, changed)
        })
    }

    /// Removes one element by identity.
    pub fn remove(&self, id: SyncUpId) -> Option<SyncUp> {
        self.mutate(|current| {
            match current.iter().position(|sync_up| sync_up.id == id) {
                Some(index) => (Some(current.remove(index)), true),
                None => (None, false),
            }
        })
    }

    /// Live reference to the element with `id`, if it is present.
    pub fn element(&self, id: SyncUpId) -> Option<SyncUpRef> {
        if self.contains(id) {
            Some(SyncUpRef::new(self.clone(), id))
        } else {
            None
        }
    }

    /// Registers `observer`; it receives the full collection after every
    /// committed mutation until the returned handle is dropped.
    pub fn subscribe(&self, observer: impl Fn(&[SyncUp]) + Send + Sync + 'static) -> Subscription {
        self.subscribe_revisions(move |_, items| observer(items))
    }

    /// Like [`subscribe`](Self::subscribe), with the revision each snapshot
    /// was committed at.
    pub fn subscribe_revisions(
        &self,
        observer: impl Fn(u64, &[SyncUp]) + Send + Sync + 'static,
    ) -> Subscription {
        let mut cell = self.inner.lock();
        let id = cell.next_observer_id;
        cell.next_observer_id += 1;
        cell.observers.insert(id, Arc::new(observer));
        Subscription {
            inner: Arc::downgrade(&self.inner),
            id,
        }
    }

    /// Whether `other` is a handle to the same storage.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Outcome of the latest completed write; `None` for in-memory cells.
    pub fn write_status(&self) -> Option<WriteStatus> {
        self.inner.writer.as_ref().map(WriteBehind::status)
    }

    /// Waits until the current revision has been written (successfully or
    /// not). Returns immediately for in-memory cells.
    pub async fn flush(&self) {
        let revision = self.revision();
        if let Some(writer) = self.inner.writer.as_ref() {
            writer.wait_for(revision).await;
        }
    }

    /// Applies `f` to the element with `id`. Returns `None` when absent.
    pub(crate) fn update_element<R>(
        &self,
        id: SyncUpId,
        f: impl FnOnce(&mut SyncUp) -> R,
    ) -> Option<R> {
        self.mutate(|current| {
            let Some(target) = current.iter_mut().find(|sync_up| sync_up.id == id) else {
                return (None, false);
            };
            let before = target.clone();
            let result = f(target);
            // The handle is scoped by identity; edits may not re-key it.
            target.id = id;
            let changed = *target != before;
            (Some(result), changed)
        })
    }

    /// Runs `f` under the lock. `f` reports whether it changed anything;
    /// only changes bump the revision, persist and notify.
    fn mutate<R>(&self, f: impl FnOnce(&mut Vec<SyncUp>) -> (R, bool)) -> R {
        let (result, notify) = {
            let mut cell = self.inner.lock();
            let (result, changed) = f(&mut cell.items);
            if !changed {
                return result;
            }
            cell.revision += 1;
            let snapshot = Arc::new(cell.items.clone());
            if let Some(writer) = self.inner.writer.as_ref() {
                writer.submit(cell.revision, Arc::clone(&snapshot));
            }
            let observers = cell.observers.values().cloned().collect::<Vec<_>>();
            (result, Some((cell.revision, snapshot, observers)))
        };

        if let Some((revision, snapshot, observers)) = notify {
            for observer in observers {
                observer(revision, snapshot.as_slice());
            }
        }
        result
    }
}

impl std::fmt::Debug for SharedSyncUps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cell = self.inner.lock();
        f.debug_struct("SharedSyncUps")
            .field("revision", &cell.revision)
            .field("items", &cell.items)
            .finish()
    }
}

fn dedupe(items: Vec<SyncUp>) -> Vec<SyncUp> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|sync_up| seen.insert(sync_up.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::SharedSyncUps;
    use crate::model::sync_up::SyncUp;
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn clones_share_storage() {
        let shared = SharedSyncUps::in_memory(Vec::new());
        let other = shared.clone();
        let sync_up = SyncUp::mock();

        assert!(shared.append(sync_up.clone()));
        assert_eq!(other.get(), vec![sync_up]);
        assert!(shared.ptr_eq(&other));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let sync_up = SyncUp::mock();
        let shared = SharedSyncUps::in_memory(vec![sync_up.clone(), sync_up.clone()]);
        assert_eq!(shared.len(), 1);
        assert!(!shared.append(sync_up));
        assert_eq!(shared.revision(), 0);
    }

    #[test]
    fn remove_at_ignores_out_of_range_offsets() {
        let items = vec![SyncUp::mock(), SyncUp::mock(), SyncUp::mock()];
        let shared = SharedSyncUps::in_memory(items.clone());

        let removed = shared.remove_at(&BTreeSet::from([0, 2, 7]));
        assert_eq!(removed, vec![items[0].clone(), items[2].clone()]);
        assert_eq!(shared.get(), vec![items[1].clone()]);
    }

    #[test]
    fn observers_see_commits_until_unsubscribed() {
        let shared = SharedSyncUps::in_memory(Vec::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let subscription = shared.subscribe(move |items| {
            seen.fetch_add(items.len(), Ordering::SeqCst);
        });

        shared.append(SyncUp::mock());
        shared.set(shared.get());
        assert_eq!(calls.load(Ordering::SeqCst), 1, "no-op set must not notify");

        subscription.unsubscribe();
        shared.append(SyncUp::mock());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn observer_may_read_collection_reentrantly() {
        let shared = SharedSyncUps::in_memory(Vec::new());
        let reader = shared.clone();
        let lens = Arc::new(AtomicUsize::new(0));
        let lens_seen = Arc::clone(&lens);
        let _subscription = shared.subscribe(move |_| {
            lens_seen.store(reader.len(), Ordering::SeqCst);
        });

        shared.append(SyncUp::mock());
        assert_eq!(lens.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn notifications_carry_committed_revision() {
        let shared = SharedSyncUps::in_memory(Vec::new());
        let revisions = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = Arc::clone(&revisions);
        let _subscription = shared.subscribe_revisions(move |revision, items| {
            sink.lock()
                .expect("sink lock")
                .push((revision, items.len()));
        });

        shared.append(SyncUp::mock());
        shared.append(SyncUp::mock());
        shared.set(shared.get());

        let revisions = revisions.lock().expect("sink lock").clone();
        assert_eq!(revisions, vec![(1, 1), (2, 2)]);
        assert_eq!(shared.revision(), 2);
    }
}
