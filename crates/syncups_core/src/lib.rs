//! Core state machines for the sync-ups meeting timer app.
//! This crate is the single source of truth for business invariants; UI
//! layers render its state and send it actions.

pub mod app;
pub mod deps;
pub mod feature;
pub mod logging;
pub mod model;
pub mod shared;
pub mod storage;

pub use app::stack::{StackElementId, StackState};
pub use app::store::Store;
pub use app::{AppAction, AppEffect, AppState, Path, PathAction, StackAction};
pub use deps::clock::{Clock, FakeClock, SystemClock};
pub use deps::ids::{IdGenerator, IncrementingIds, RandomIds};
pub use deps::Environment;
pub use feature::alert::{AlertAction, AlertButton, AlertState, ButtonRole};
pub use feature::record_meeting::{
    RecordAlertAction, RecordMeetingAction, RecordMeetingState, RECORD_TICK_INTERVAL,
};
pub use feature::sync_up_detail::{
    DetailAlertAction, DetailDestination, SyncUpDetailAction, SyncUpDetailDelegate,
    SyncUpDetailState,
};
pub use feature::sync_up_form::{FormField, SyncUpFormAction, SyncUpFormState};
pub use feature::sync_ups_list::{SyncUpsListAction, SyncUpsListDelegate, SyncUpsListState};
pub use feature::{Effect, Feature};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::sync_up::{
    Attendee, AttendeeId, Meeting, MeetingId, SyncUp, SyncUpId, SyncUpValidationError,
    DEFAULT_DURATION_SECS,
};
pub use model::theme::{AccentColor, Theme};
pub use shared::{SharedSyncUps, Subscription, SyncUpRef, WriteStatus};
pub use storage::{
    resolve_document_path, DocumentStore, JsonFileStore, MemoryDocumentStore, StorageError,
    StorageResult, SYNC_UPS_DOCUMENT_KEY,
};

/// Health check used by the FFI and CLI smoke paths.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
