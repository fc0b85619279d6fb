use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use syncups_core::{
    Attendee, AttendeeId, DocumentStore, JsonFileStore, Meeting, MeetingId, MemoryDocumentStore,
    SharedSyncUps, SyncUp, SyncUpId, Theme,
};
use tempfile::TempDir;
use tokio::runtime::Handle;
use uuid::Uuid;

fn sync_up(n: u128, title: &str) -> SyncUp {
    let mut sync_up = SyncUp::new(SyncUpId(Uuid::from_u128(n)));
    sync_up.title = title.to_string();
    sync_up.duration_secs = 60;
    sync_up.theme = Theme::Teal;
    sync_up.attendees = vec![Attendee::named(AttendeeId(Uuid::from_u128(n + 100)), "Blob")];
    sync_up
}

#[tokio::test]
async fn mutations_survive_reload_from_file() {
    let dir = TempDir::new().expect("tempdir");
    let store = Arc::new(JsonFileStore::in_dir(dir.path()));
    let shared = SharedSyncUps::load(store.clone(), &Handle::current());
    assert!(shared.is_empty());

    shared.append(sync_up(1, "Design"));
    shared.append(sync_up(2, "Engineering"));
    let reference = shared.element(SyncUpId(Uuid::from_u128(1))).expect("element");
    reference.update(|value| {
        value.prepend_meeting(Meeting {
            id: MeetingId(Uuid::from_u128(7)),
            date_epoch_ms: 1_700_000_000_000,
            transcript: "Notes".to_string(),
        })
    });
    shared.flush().await;

    let reloaded = SharedSyncUps::load(
        Arc::new(JsonFileStore::new(store.path())),
        &Handle::current(),
    );
    assert_eq!(reloaded.get(), shared.get());
    assert_eq!(reloaded.get()[0].meetings[0].transcript, "Notes");
}

#[tokio::test]
async fn document_uses_stable_field_names() {
    let dir = TempDir::new().expect("tempdir");
    let store = Arc::new(JsonFileStore::in_dir(dir.path()));
    let shared = SharedSyncUps::load(store.clone(), &Handle::current());
    let mut value = sync_up(1, "Design");
    value.meetings.push(Meeting {
        id: MeetingId(Uuid::from_u128(7)),
        date_epoch_ms: 42,
        transcript: String::new(),
    });
    shared.append(value);
    shared.flush().await;

    let raw = std::fs::read_to_string(store.path()).expect("document");
    let json: serde_json::Value = serde_json::from_str(&raw).expect("json");
    let first = &json[0];
    assert_eq!(first["title"], "Design");
    assert_eq!(first["duration"], 60);
    assert_eq!(first["theme"], "teal");
    assert_eq!(first["meetings"][0]["date"], 42);
    assert_eq!(
        first["id"],
        serde_json::Value::String(Uuid::from_u128(1).to_string())
    );
}

#[tokio::test]
async fn malformed_document_loads_empty_and_is_replaced() {
    let dir = TempDir::new().expect("tempdir");
    let store = Arc::new(JsonFileStore::in_dir(dir.path()));
    std::fs::write(store.path(), b"{ not json").expect("seed");

    let shared = SharedSyncUps::load(store.clone(), &Handle::current());
    assert!(shared.is_empty());

    shared.append(sync_up(1, "Design"));
    shared.flush().await;

    assert_eq!(store.load().expect("valid document"), vec![sync_up(1, "Design")]);
}

#[tokio::test]
async fn failed_write_keeps_memory_and_reports_error() {
    let store = Arc::new(MemoryDocumentStore::new());
    let shared = SharedSyncUps::load(store.clone(), &Handle::current());
    store.set_fail_writes(true);

    shared.append(sync_up(1, "Design"));
    shared.flush().await;

    assert_eq!(shared.len(), 1);
    let status = shared.write_status().expect("persisted collection");
    assert_eq!(status.revision, 1);
    assert!(status.error.is_some());
    assert!(store.stored().expect("decode").is_empty());

    store.set_fail_writes(false);
    shared.append(sync_up(2, "Engineering"));
    shared.flush().await;

    assert_eq!(shared.write_status().and_then(|status| status.error), None);
    assert_eq!(store.stored().expect("decode"), shared.get());
}

#[tokio::test]
async fn burst_of_writes_converges_on_last_state() {
    let store = Arc::new(MemoryDocumentStore::new());
    let shared = SharedSyncUps::load(store.clone(), &Handle::current());

    for n in 1..=20 {
        shared.append(sync_up(n, &format!("Sync-up {n}")));
    }
    shared.remove(SyncUpId(Uuid::from_u128(3)));
    shared.flush().await;

    assert_eq!(shared.revision(), 21);
    assert_eq!(store.stored().expect("decode"), shared.get());
    assert!(store.write_count() <= 21);
}

#[tokio::test]
async fn no_op_mutations_do_not_write() {
    let store = Arc::new(MemoryDocumentStore::with_sync_ups(&[sync_up(1, "Design")]).expect("seed"));
    let shared = SharedSyncUps::load(store.clone(), &Handle::current());

    assert!(!shared.append(sync_up(1, "Duplicate")));
    shared.remove(SyncUpId(Uuid::from_u128(404)));
    shared.flush().await;

    assert_eq!(shared.revision(), 0);
    assert_eq!(store.write_count(), 0);
}

#[test]
fn observers_see_every_commit_until_dropped() {
    let shared = SharedSyncUps::in_memory(Vec::new());
    let seen = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&seen);
    let subscription = shared.subscribe(move |items| {
        counter.store(items.len(), Ordering::SeqCst);
    });

    shared.append(sync_up(1, "Design"));
    shared.append(sync_up(2, "Engineering"));
    assert_eq!(seen.load(Ordering::SeqCst), 2);

    drop(subscription);
    shared.append(sync_up(3, "Product"));
    assert_eq!(seen.load(Ordering::SeqCst), 2);
}

#[test]
fn element_handle_observes_only_its_sync_up() {
    let shared = SharedSyncUps::in_memory(vec![sync_up(1, "Design"), sync_up(2, "Engineering")]);
    let reference = shared.element(SyncUpId(Uuid::from_u128(1))).expect("element");
    let changes = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&changes);
    let _subscription = reference.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    shared
        .element(SyncUpId(Uuid::from_u128(2)))
        .expect("element")
        .update(|value| value.title = "Platform".to_string());
    assert_eq!(changes.load(Ordering::SeqCst), 0);

    reference.update(|value| value.title = "Design v2".to_string());
    assert_eq!(changes.load(Ordering::SeqCst), 1);

    shared.remove(reference.id());
    assert_eq!(changes.load(Ordering::SeqCst), 2);
    assert!(!reference.exists());
    assert_eq!(reference.update(|value| value.title.clear()), None);
}
