//! Identity-scoped live reference into the shared collection.

use super::{SharedSyncUps, Subscription};
use crate::model::sync_up::{SyncUp, SyncUpId};
use log::debug;
use std::sync::Mutex;

/// Two-way binding to one element of a [`SharedSyncUps`].
///
/// Reads always return the canonical value; writes land in the parent
/// collection and are visible through every other handle immediately. Once
/// the element is removed from the collection, reads return `None` and writes
/// are discarded.
#[derive(Clone)]
pub struct SyncUpRef {
    collection: SharedSyncUps,
    id: SyncUpId,
}

impl SyncUpRef {
    pub(super) fn new(collection: SharedSyncUps, id: SyncUpId) -> Self {
        Self { collection, id }
    }

    /// Reference into a private single-element collection.
    pub fn detached(sync_up: SyncUp) -> Self {
        let id = sync_up.id;
        Self::new(SharedSyncUps::in_memory(vec![sync_up]), id)
    }

    pub fn id(&self) -> SyncUpId {
        self.id
    }

    /// The parent collection this reference reads through.
    pub fn collection(&self) -> &SharedSyncUps {
        &self.collection
    }

    pub fn get(&self) -> Option<SyncUp> {
        self.collection.find(self.id)
    }

    pub fn exists(&self) -> bool {
        self.collection.contains(self.id)
    }

    /// Mutates the element in place. Returns `None` (and drops the write)
    /// when the element no longer exists.
    pub fn update<R>(&self, f: impl FnOnce(&mut SyncUp) -> R) -> Option<R> {
        let result = self.collection.update_element(self.id, f);
        if result.is_none() {
            debug!(
                "event=shared_write module=shared status=discarded sync_up_id={}",
                self.id
            );
        }
        result
    }

    /// Replaces the element wholesale, keeping this reference's identity.
    pub fn set(&self, value: SyncUp) -> bool {
        self.update(move |current| *current = value).is_some()
    }

    /// Removes the element from the parent collection.
    pub fn remove(&self) -> Option<SyncUp> {
        self.collection.remove(self.id)
    }

    /// Observes this element only: `observer` runs when its value changes,
    /// with `None` once it has been removed. Snapshots older than the last
    /// one seen are skipped.
    pub fn subscribe(
        &self,
        observer: impl Fn(Option<&SyncUp>) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.id;
        let latest = Mutex::new(Latest {
            revision: self.collection.revision(),
            value: self.get(),
        });
        self.collection.subscribe_revisions(move |revision, items| {
            let current = items.iter().find(|sync_up| sync_up.id == id);
            let changed = {
                let mut latest = match latest.lock() {
                    Ok(guard) => guard,
                    Err(poisoned) => poisoned.into_inner(),
                };
                latest.advance(revision, current)
            };
            if changed {
                observer(current);
            }
        })
    }
}

/// Last value delivered to an element observer.
struct Latest {
    revision: u64,
    value: Option<SyncUp>,
}

impl Latest {
    /// Records `current` at `revision`; true when it is newer and differs.
    fn advance(&mut self, revision: u64, current: Option<&SyncUp>) -> bool {
        if revision <= self.revision {
            return false;
        }
        self.revision = revision;
        if self.value.as_ref() == current {
            return false;
        }
        self.value = current.cloned();
        true
    }
}

impl PartialEq for SyncUpRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.collection.ptr_eq(&other.collection)
    }
}

impl std::fmt::Debug for SyncUpRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncUpRef")
            .field("id", &self.id)
            .field("value", &self.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{Latest, SyncUpRef};
    use crate::model::sync_up::{SyncUp, SyncUpId};
    use crate::shared::SharedSyncUps;
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;

    #[test]
    fn writes_through_reference_reach_parent_and_siblings() {
        let shared = SharedSyncUps::in_memory(vec![SyncUp::mock()]);
        let id = shared.get()[0].id;
        let detail = shared.element(id).expect("element exists");
        let recorder = shared.element(id).expect("element exists");

        detail.update(|sync_up| sync_up.title = "Renamed".to_string());
        assert_eq!(recorder.get().map(|s| s.title), Some("Renamed".to_string()));
        assert_eq!(shared.get()[0].title, "Renamed");
    }

    #[test]
    fn writes_after_removal_are_discarded() {
        let shared = SharedSyncUps::in_memory(vec![SyncUp::mock()]);
        let id = shared.get()[0].id;
        let reference = shared.element(id).expect("element exists");

        assert!(shared.remove(id).is_some());
        assert!(!reference.set(SyncUp::mock()));
        assert!(reference.update(|s| s.title.clear()).is_none());
        assert!(shared.is_empty());
    }

    #[test]
    fn set_keeps_reference_identity() {
        let reference = SyncUpRef::detached(SyncUp::mock());
        let mut replacement = SyncUp::mock();
        replacement.id = SyncUpId(Uuid::from_u128(77));
        replacement.title = "Other".to_string();

        assert!(reference.set(replacement));
        let current = reference.get().expect("still present");
        assert_eq!(current.id, reference.id());
        assert_eq!(current.title, "Other");
    }

    #[test]
    fn element_subscription_filters_unrelated_changes() {
        let first = SyncUp::mock();
        let shared = SharedSyncUps::in_memory(vec![first.clone(), SyncUp::mock()]);
        let reference = shared.element(first.id).expect("element exists");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _subscription = reference.subscribe(move |value| {
            sink.lock()
                .expect("sink lock")
                .push(value.map(|s| s.title.clone()));
        });

        let second_id = shared.get()[1].id;
        shared
            .element(second_id)
            .expect("second exists")
            .update(|s| s.title = "ignored".to_string());
        reference.update(|s| s.title = "seen".to_string());
        reference.remove();

        let seen = seen.lock().expect("sink lock").clone();
        assert_eq!(seen, vec![Some("seen".to_string()), None]);
    }

    #[test]
    fn stale_snapshots_do_not_overwrite_newer_values() {
        let older = SyncUp::mock();
        let mut newer = older.clone();
        newer.title = "Newer".to_string();
        let mut latest = Latest {
            revision: 0,
            value: Some(older.clone()),
        };

        assert!(latest.advance(2, Some(&newer)));
        assert!(!latest.advance(1, Some(&older)), "revision 1 arrived late");
        assert_eq!(latest.value.as_ref(), Some(&newer));
        assert!(!latest.advance(3, Some(&newer)), "unchanged value");
        assert!(latest.advance(4, None));
        assert_eq!(latest.revision, 4);
        assert!(latest.value.is_none());
    }
}
