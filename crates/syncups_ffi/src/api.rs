//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Own the process-wide session: tokio runtime, persisted collection and
//!   the app store driving every screen.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - A driver task on the session runtime applies timer actions as they
//!   are queued, so meetings advance and save with no calls from Dart.
//!   Every call also drains first, so returned snapshots reflect every tick
//!   queued so far.
//! - Screens are addressed by stack element id; ids of popped screens are
//!   never reused and calls against them fail with `ok=false`.

use once_cell::sync::OnceCell;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use syncups_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    resolve_document_path, AlertAction, AppAction, AppState, DetailAlertAction,
    DetailDestination, Environment, JsonFileStore, MeetingId, Path, PathAction,
    RecordAlertAction, RecordMeetingAction, RecordMeetingState, SharedSyncUps, StackAction,
    StackElementId, Store, SyncUp, SyncUpDetailAction, SyncUpFormAction, SyncUpId,
    SyncUpsListAction, Theme,
};
use tokio::runtime::Runtime;
use tokio::sync::Notify;
use uuid::Uuid;

static SESSION: OnceCell<Mutex<Session>> = OnceCell::new();

struct Session {
    // Owns the worker threads the store's effect tasks and the driver run on.
    runtime: Runtime,
    store: Store,
    document_path: PathBuf,
}

impl Session {
    fn start() -> Result<Mutex<Self>, String> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("syncups-runtime")
            .enable_all()
            .build()
            .map_err(|err| format!("runtime start failed: {err}"))?;
        let document_path = resolve_document_path();
        let shared = SharedSyncUps::load(
            Arc::new(JsonFileStore::new(document_path.clone())),
            runtime.handle(),
        );
        let store = Store::new(
            AppState::new(shared),
            Environment::live(),
            runtime.handle().clone(),
        );
        log::info!(
            "event=ffi_session_start module=ffi status=ok count={}",
            store.state().sync_ups().len()
        );
        Ok(Mutex::new(Self {
            runtime,
            store,
            document_path,
        }))
    }

    fn shared(&self) -> &SharedSyncUps {
        self.store.state().sync_ups()
    }

    fn top_id(&self) -> Option<StackElementId> {
        self.store.state().path.last().map(|(id, _)| id)
    }

    fn detail(&self, element: StackElementId) -> Result<&syncups_core::SyncUpDetailState, String> {
        match self.store.state().path.get(element) {
            Some(Path::Detail(detail)) => Ok(detail),
            Some(other) => Err(format!("element {element} is a {} screen", other.kind())),
            None => Err(format!("element {element} is not on the stack")),
        }
    }

    fn record(&self, element: StackElementId) -> Result<&RecordMeetingState, String> {
        match self.store.state().path.get(element) {
            Some(Path::RecordMeeting(record)) => Ok(record),
            Some(other) => Err(format!("element {element} is a {} screen", other.kind())),
            None => Err(format!("element {element} is not on the stack")),
        }
    }

    fn send_detail(&mut self, element: StackElementId, action: SyncUpDetailAction) {
        self.store
            .send(AppAction::element(element, PathAction::Detail(action)));
    }

    fn send_record(&mut self, element: StackElementId, action: RecordMeetingAction) {
        self.store
            .send(AppAction::element(element, PathAction::RecordMeeting(action)));
    }
}

fn lock(session: &Mutex<Session>) -> MutexGuard<'_, Session> {
    match session.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn session() -> Result<&'static Mutex<Session>, String> {
    let mut started = false;
    let session = SESSION.get_or_try_init(|| {
        started = true;
        Session::start()
    })?;
    if started {
        let guard = lock(session);
        let signal = guard.store.action_signal();
        guard.runtime.spawn(drive(session, signal));
    }
    Ok(session)
}

/// Applies effect-produced actions as they are queued.
async fn drive(session: &'static Mutex<Session>, signal: Arc<Notify>) {
    loop {
        signal.notified().await;
        let applied = lock(session).store.drain();
        if applied > 0 {
            log::debug!("event=ffi_drive module=ffi status=ok applied={applied}");
        }
    }
}

fn with_session<T>(f: impl FnOnce(&mut Session) -> Result<T, String>) -> Result<T, String> {
    let mut guard = lock(session()?);
    guard.store.drain();
    f(&mut guard)
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Row of the sync-ups list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncUpSummary {
    pub id: String,
    pub title: String,
    /// Theme key (`bubblegum`, `navy`, ...).
    pub theme: String,
    /// `black` or `white`.
    pub accent: String,
    pub attendee_count: u32,
    pub duration_secs: u64,
}

/// List response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncUpListResponse {
    pub items: Vec<SyncUpSummary>,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendeeView {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingView {
    pub id: String,
    pub date_epoch_ms: i64,
    pub transcript: String,
}

/// Full sync-up value as shown by the detail screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncUpView {
    pub id: String,
    pub title: String,
    pub theme: String,
    pub theme_name: String,
    pub duration_secs: u64,
    pub attendees: Vec<AttendeeView>,
    /// Most recent first.
    pub meetings: Vec<MeetingView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncUpResponse {
    pub ok: bool,
    pub sync_up: Option<SyncUpView>,
    pub message: String,
}

/// Input shared by add and edit flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncUpDraft {
    pub title: String,
    pub duration_secs: u64,
    /// Theme key; unknown keys are rejected.
    pub theme: String,
    /// Speaking order. Blank names are allowed.
    pub attendee_names: Vec<String>,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Sync-up the action created or touched, when there is one.
    pub sync_up_id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, sync_up_id: Option<String>) -> Self {
        Self {
            ok: true,
            sync_up_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            sync_up_id: None,
            message: message.into(),
        }
    }
}

/// Result of a call that pushes a screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationResponse {
    pub ok: bool,
    /// Stack element id of the pushed screen.
    pub element_id: Option<u64>,
    pub message: String,
}

impl NavigationResponse {
    fn pushed(message: impl Into<String>, element: StackElementId) -> Self {
        Self {
            ok: true,
            element_id: Some(element.0),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            element_id: None,
            message: message.into(),
        }
    }
}

/// One entry of the navigation stack, bottom first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackEntry {
    pub element_id: u64,
    /// `detail|meeting|record_meeting`.
    pub kind: String,
}

/// Snapshot of a running meeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordMeetingView {
    pub ok: bool,
    pub seconds_elapsed: u64,
    pub duration_remaining_secs: u64,
    pub speaker_index: u32,
    pub speaker_name: String,
    pub attendee_count: u32,
    /// Title of the end-meeting alert while it is shown.
    pub alert_title: Option<String>,
    /// False once the recorder left the stack (completed, saved or discarded).
    pub active: bool,
    pub message: String,
}

impl RecordMeetingView {
    fn inactive(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            seconds_elapsed: 0,
            duration_remaining_secs: 0,
            speaker_index: 0,
            speaker_name: String::new(),
            attendee_count: 0,
            alert_title: None,
            active: false,
            message: message.into(),
        }
    }
}

/// Lists every sync-up in display order.
///
/// # FFI contract
/// - Sync call, in-memory read.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn list_sync_ups() -> SyncUpListResponse {
    match with_session(|session| Ok(session.shared().get())) {
        Ok(sync_ups) => {
            let items = sync_ups.iter().map(to_summary).collect::<Vec<_>>();
            let message = if items.is_empty() {
                "No sync-ups.".to_string()
            } else {
                format!("Found {} sync-up(s).", items.len())
            };
            SyncUpListResponse { items, message }
        }
        Err(err) => SyncUpListResponse {
            items: Vec::new(),
            message: format!("list_sync_ups failed: {err}"),
        },
    }
}

/// Reads one sync-up by id.
#[flutter_rust_bridge::frb(sync)]
pub fn get_sync_up(sync_up_id: String) -> SyncUpResponse {
    let result = parse_sync_up_id(&sync_up_id).and_then(|id| {
        with_session(|session| {
            session
                .shared()
                .find(id)
                .ok_or_else(|| format!("sync-up {id} not found"))
        })
    });
    match result {
        Ok(sync_up) => SyncUpResponse {
            ok: true,
            sync_up: Some(to_view(&sync_up)),
            message: "Sync-up loaded.".to_string(),
        },
        Err(err) => SyncUpResponse {
            ok: false,
            sync_up: None,
            message: format!("get_sync_up failed: {err}"),
        },
    }
}

/// Adds a sync-up through the list's add sheet.
///
/// # FFI contract
/// - Sync call; persistence happens in the background.
/// - Invalid drafts are rejected and the sheet is discarded.
#[flutter_rust_bridge::frb(sync)]
pub fn add_sync_up(draft: SyncUpDraft) -> ActionResponse {
    let result = with_session(|session| {
        let theme = parse_theme(&draft.theme)?;
        session
            .store
            .send(AppAction::SyncUpsList(SyncUpsListAction::AddSyncUpButtonTapped));
        let Some(form) = session.store.state().sync_ups_list.add_sync_up.as_ref() else {
            return Err("add sheet did not open".to_string());
        };
        let id = form.sync_up.id;
        let edits = form_edits(&form.sync_up, &draft, theme);
        for edit in edits {
            session
                .store
                .send(AppAction::SyncUpsList(SyncUpsListAction::AddSyncUp(edit)));
        }
        let names = draft_names(&session.store, &draft);
        for edit in names {
            session
                .store
                .send(AppAction::SyncUpsList(SyncUpsListAction::AddSyncUp(edit)));
        }
        session
            .store
            .send(AppAction::SyncUpsList(SyncUpsListAction::ConfirmAddButtonTapped));
        if session.store.state().sync_ups_list.add_sync_up.is_some() {
            session
                .store
                .send(AppAction::SyncUpsList(SyncUpsListAction::DiscardButtonTapped));
            return Err("draft is invalid".to_string());
        }
        Ok(id)
    });
    match result {
        Ok(id) => ActionResponse::success("Sync-up added.", Some(id.to_string())),
        Err(err) => ActionResponse::failure(format!("add_sync_up failed: {err}")),
    }
}

/// Deletes a sync-up from the list by id.
#[flutter_rust_bridge::frb(sync)]
pub fn delete_sync_up(sync_up_id: String) -> ActionResponse {
    let result = parse_sync_up_id(&sync_up_id).and_then(|id| {
        with_session(|session| {
            let offset = session
                .shared()
                .get()
                .iter()
                .position(|sync_up| sync_up.id == id)
                .ok_or_else(|| format!("sync-up {id} not found"))?;
            session
                .store
                .send(AppAction::SyncUpsList(SyncUpsListAction::Delete(
                    BTreeSet::from([offset]),
                )));
            Ok(id)
        })
    });
    match result {
        Ok(id) => ActionResponse::success("Sync-up deleted.", Some(id.to_string())),
        Err(err) => ActionResponse::failure(format!("delete_sync_up failed: {err}")),
    }
}

/// Pushes the detail screen for a sync-up.
#[flutter_rust_bridge::frb(sync)]
pub fn open_sync_up(sync_up_id: String) -> NavigationResponse {
    let result = parse_sync_up_id(&sync_up_id).and_then(|id| {
        with_session(|session| {
            let before = session.top_id();
            session
                .store
                .send(AppAction::SyncUpsList(SyncUpsListAction::SyncUpTapped(id)));
            pushed_element(session, before)
        })
    });
    match result {
        Ok(element) => NavigationResponse::pushed("Detail opened.", element),
        Err(err) => NavigationResponse::failure(format!("open_sync_up failed: {err}")),
    }
}

/// Edits the sync-up shown by a detail screen and commits on success.
#[flutter_rust_bridge::frb(sync)]
pub fn edit_sync_up(detail_element_id: u64, draft: SyncUpDraft) -> ActionResponse {
    let element = StackElementId(detail_element_id);
    let result = with_session(|session| {
        let theme = parse_theme(&draft.theme)?;
        let id = session.detail(element)?.sync_up.id();
        session.send_detail(element, SyncUpDetailAction::EditButtonTapped);
        let Some(form) = session.detail(element)?.edit_form() else {
            return Err(format!("sync-up {id} no longer exists"));
        };
        let mut edits = form_edits(&form.sync_up, &draft, theme);
        let current = form.sync_up.attendees.len();
        let wanted = draft.attendee_names.len().max(1);
        if current > wanted {
            edits.push(SyncUpFormAction::DeleteAttendees((wanted..current).collect()));
        }
        for edit in edits {
            session.send_detail(element, SyncUpDetailAction::Edit(edit));
        }
        let names = detail_names(session.detail(element)?, &draft);
        for edit in names {
            session.send_detail(element, SyncUpDetailAction::Edit(edit));
        }
        session.send_detail(element, SyncUpDetailAction::DoneEditButtonTapped);
        if session.detail(element)?.edit_form().is_some() {
            session.send_detail(element, SyncUpDetailAction::CancelEditButtonTapped);
            return Err("draft is invalid".to_string());
        }
        Ok(id)
    });
    match result {
        Ok(id) => ActionResponse::success("Sync-up updated.", Some(id.to_string())),
        Err(err) => ActionResponse::failure(format!("edit_sync_up failed: {err}")),
    }
}

/// Deletes the sync-up shown by a detail screen (confirming the alert) and
/// pops that screen.
#[flutter_rust_bridge::frb(sync)]
pub fn confirm_delete_sync_up(detail_element_id: u64) -> ActionResponse {
    let element = StackElementId(detail_element_id);
    let result = with_session(|session| {
        let id = session.detail(element)?.sync_up.id();
        session.send_detail(element, SyncUpDetailAction::DeleteButtonTapped);
        let alert_shown = matches!(
            session.detail(element)?.destination,
            Some(DetailDestination::Alert(_))
        );
        if !alert_shown {
            return Err("delete confirmation did not open".to_string());
        }
        session.send_detail(
            element,
            SyncUpDetailAction::Alert(AlertAction::Presented(DetailAlertAction::ConfirmDeletion)),
        );
        Ok(id)
    });
    match result {
        Ok(id) => ActionResponse::success("Sync-up deleted.", Some(id.to_string())),
        Err(err) => ActionResponse::failure(format!("confirm_delete_sync_up failed: {err}")),
    }
}

/// Pushes the read-only meeting screen for one past meeting.
#[flutter_rust_bridge::frb(sync)]
pub fn open_meeting(detail_element_id: u64, meeting_id: String) -> NavigationResponse {
    let element = StackElementId(detail_element_id);
    let result = Uuid::parse_str(meeting_id.trim())
        .map_err(|err| format!("invalid meeting id: {err}"))
        .and_then(|uuid| {
            with_session(|session| {
                session.detail(element)?;
                let before = session.top_id();
                session.send_detail(element, SyncUpDetailAction::MeetingTapped(MeetingId(uuid)));
                pushed_element(session, before)
            })
        });
    match result {
        Ok(pushed) => NavigationResponse::pushed("Meeting opened.", pushed),
        Err(err) => NavigationResponse::failure(format!("open_meeting failed: {err}")),
    }
}

/// Pushes the recorder for the detail's sync-up and starts its timer.
#[flutter_rust_bridge::frb(sync)]
pub fn start_meeting(detail_element_id: u64) -> NavigationResponse {
    let element = StackElementId(detail_element_id);
    let result = with_session(|session| {
        session.detail(element)?;
        let before = session.top_id();
        session.send_detail(element, SyncUpDetailAction::StartMeetingButtonTapped);
        let record = pushed_element(session, before)?;
        session.send_record(record, RecordMeetingAction::OnAppear);
        Ok(record)
    });
    match result {
        Ok(record) => NavigationResponse::pushed("Meeting started.", record),
        Err(err) => NavigationResponse::failure(format!("start_meeting failed: {err}")),
    }
}

/// Current state of a recorder screen.
///
/// # FFI contract
/// - Sync call; applies pending ticks before reading.
/// - A recorder that already left the stack reports `active=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn record_meeting_state(record_element_id: u64) -> RecordMeetingView {
    let element = StackElementId(record_element_id);
    let result = with_session(|session| {
        let record = session.record(element)?;
        let sync_up = record.sync_up.get();
        let attendees = sync_up.map(|value| value.attendees).unwrap_or_default();
        let speaker_name = attendees
            .get(record.speaker_index)
            .map(|attendee| attendee.name.clone())
            .unwrap_or_default();
        Ok(RecordMeetingView {
            ok: true,
            seconds_elapsed: record.seconds_elapsed,
            duration_remaining_secs: record.duration_remaining_secs(),
            speaker_index: u32::try_from(record.speaker_index).unwrap_or(u32::MAX),
            speaker_name,
            attendee_count: u32::try_from(attendees.len()).unwrap_or(u32::MAX),
            alert_title: record.alert.as_ref().map(|alert| alert.title.clone()),
            active: true,
            message: "Meeting in progress.".to_string(),
        })
    });
    result.unwrap_or_else(|err| RecordMeetingView::inactive(format!("record_meeting_state: {err}")))
}

/// Skips to the next speaker, or asks to end on the last one.
#[flutter_rust_bridge::frb(sync)]
pub fn record_meeting_next(record_element_id: u64) -> RecordMeetingView {
    send_to_recorder(record_element_id, RecordMeetingAction::NextButtonTapped)
}

/// Replaces the running transcript.
#[flutter_rust_bridge::frb(sync)]
pub fn record_meeting_transcript(record_element_id: u64, transcript: String) -> RecordMeetingView {
    send_to_recorder(
        record_element_id,
        RecordMeetingAction::TranscriptChanged(transcript),
    )
}

/// Shows the end-meeting alert.
#[flutter_rust_bridge::frb(sync)]
pub fn end_meeting(record_element_id: u64) -> RecordMeetingView {
    send_to_recorder(record_element_id, RecordMeetingAction::EndMeetingButtonTapped)
}

/// Answers the end-meeting alert: `save`, `discard` or `resume`.
#[flutter_rust_bridge::frb(sync)]
pub fn resolve_end_meeting(record_element_id: u64, choice: String) -> RecordMeetingView {
    let action = match choice.trim().to_ascii_lowercase().as_str() {
        "save" => AlertAction::Presented(RecordAlertAction::SaveMeeting),
        "discard" => AlertAction::Presented(RecordAlertAction::DiscardMeeting),
        "resume" => AlertAction::Dismissed,
        other => {
            return RecordMeetingView::inactive(format!(
                "resolve_end_meeting failed: unknown choice `{other}`"
            ))
        }
    };
    send_to_recorder(record_element_id, RecordMeetingAction::Alert(action))
}

/// Pops `element_id` and everything above it, or the top screen when `None`.
#[flutter_rust_bridge::frb(sync)]
pub fn pop_screen(element_id: Option<u64>) -> ActionResponse {
    let result = with_session(|session| {
        let action = match element_id {
            Some(raw) => {
                let element = StackElementId(raw);
                if !session.store.state().path.contains(element) {
                    return Err(format!("element {element} is not on the stack"));
                }
                StackAction::PopFrom(element)
            }
            None => StackAction::Pop,
        };
        session.store.send(AppAction::Path(action));
        Ok(())
    });
    match result {
        Ok(()) => ActionResponse::success("Screen closed.", None),
        Err(err) => ActionResponse::failure(format!("pop_screen failed: {err}")),
    }
}

/// Current navigation stack, bottom first.
#[flutter_rust_bridge::frb(sync)]
pub fn navigation_stack() -> Vec<StackEntry> {
    with_session(|session| {
        Ok(session
            .store
            .state()
            .path
            .iter()
            .map(|(id, path)| StackEntry {
                element_id: id.0,
                kind: path.kind().to_string(),
            })
            .collect())
    })
    .unwrap_or_default()
}

/// Absolute path of the persisted document this session uses.
#[flutter_rust_bridge::frb(sync)]
pub fn document_path() -> String {
    with_session(|session| Ok(session.document_path.display().to_string()))
        .unwrap_or_default()
}

fn send_to_recorder(record_element_id: u64, action: RecordMeetingAction) -> RecordMeetingView {
    let element = StackElementId(record_element_id);
    let sent = with_session(|session| {
        session.record(element)?;
        session.send_record(element, action);
        Ok(())
    });
    match sent {
        Ok(()) => record_meeting_state(record_element_id),
        Err(err) => RecordMeetingView::inactive(format!("recorder action failed: {err}")),
    }
}

fn pushed_element(
    session: &Session,
    before: Option<StackElementId>,
) -> Result<StackElementId, String> {
    match session.top_id() {
        Some(top) if Some(top) != before => Ok(top),
        _ => Err("nothing was pushed".to_string()),
    }
}

/// Title, duration, theme and attendee-count edits for a working sync-up.
fn form_edits(current: &SyncUp, draft: &SyncUpDraft, theme: Theme) -> Vec<SyncUpFormAction> {
    let mut edits = vec![
        SyncUpFormAction::SetTitle(draft.title.trim().to_string()),
        SyncUpFormAction::SetDuration(draft.duration_secs),
        SyncUpFormAction::SetTheme(theme),
    ];
    let wanted = draft.attendee_names.len().max(1);
    for _ in current.attendees.len()..wanted {
        edits.push(SyncUpFormAction::AddAttendeeButtonTapped);
    }
    edits
}

fn name_edits(working: &SyncUp, draft: &SyncUpDraft) -> Vec<SyncUpFormAction> {
    working
        .attendees
        .iter()
        .zip(draft.attendee_names.iter())
        .map(|(attendee, name)| SyncUpFormAction::SetAttendeeName {
            id: attendee.id,
            name: name.trim().to_string(),
        })
        .collect()
}

fn draft_names(store: &Store, draft: &SyncUpDraft) -> Vec<SyncUpFormAction> {
    store
        .state()
        .sync_ups_list
        .add_sync_up
        .as_ref()
        .map(|form| name_edits(&form.sync_up, draft))
        .unwrap_or_default()
}

fn detail_names(
    detail: &syncups_core::SyncUpDetailState,
    draft: &SyncUpDraft,
) -> Vec<SyncUpFormAction> {
    detail
        .edit_form()
        .map(|form| name_edits(&form.sync_up, draft))
        .unwrap_or_default()
}

fn parse_sync_up_id(raw: &str) -> Result<SyncUpId, String> {
    Uuid::parse_str(raw.trim())
        .map(SyncUpId)
        .map_err(|err| format!("invalid sync-up id: {err}"))
}

fn parse_theme(raw: &str) -> Result<Theme, String> {
    let key = raw.trim().to_ascii_lowercase();
    if key.is_empty() {
        return Ok(Theme::default());
    }
    Theme::from_key(&key).ok_or_else(|| format!("unknown theme `{key}`"))
}

fn to_summary(sync_up: &SyncUp) -> SyncUpSummary {
    SyncUpSummary {
        id: sync_up.id.to_string(),
        title: sync_up.title.clone(),
        theme: sync_up.theme.key().to_string(),
        accent: accent_label(sync_up.theme).to_string(),
        attendee_count: u32::try_from(sync_up.attendees.len()).unwrap_or(u32::MAX),
        duration_secs: sync_up.duration_secs,
    }
}

fn to_view(sync_up: &SyncUp) -> SyncUpView {
    SyncUpView {
        id: sync_up.id.to_string(),
        title: sync_up.title.clone(),
        theme: sync_up.theme.key().to_string(),
        theme_name: sync_up.theme.name(),
        duration_secs: sync_up.duration_secs,
        attendees: sync_up
            .attendees
            .iter()
            .map(|attendee| AttendeeView {
                id: attendee.id.to_string(),
                name: attendee.name.clone(),
            })
            .collect(),
        meetings: sync_up
            .meetings
            .iter()
            .map(|meeting| MeetingView {
                id: meeting.id.to_string(),
                date_epoch_ms: meeting.date_epoch_ms,
                transcript: meeting.transcript.clone(),
            })
            .collect(),
    }
}

fn accent_label(theme: Theme) -> &'static str {
    match theme.accent() {
        syncups_core::AccentColor::Black => "black",
        syncups_core::AccentColor::White => "white",
    }
}
