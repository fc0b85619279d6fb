use std::sync::Arc;
use syncups_core::{
    AlertAction, Attendee, AttendeeId, ButtonRole, DetailAlertAction, DetailDestination, Effect,
    Environment, FakeClock, Feature, IncrementingIds, Meeting, MeetingId, SharedSyncUps, SyncUp,
    SyncUpDetailAction, SyncUpDetailDelegate, SyncUpDetailState, SyncUpFormAction, SyncUpId,
};
use uuid::Uuid;

fn env() -> Environment {
    Environment::new(Arc::new(IncrementingIds::new()), Arc::new(FakeClock::new(0)))
}

fn sync_up() -> SyncUp {
    let mut sync_up = SyncUp::new(SyncUpId(Uuid::from_u128(1)));
    sync_up.title = "Design".to_string();
    sync_up.duration_secs = 60;
    sync_up.attendees = vec![
        Attendee::named(AttendeeId(Uuid::from_u128(10)), "Blob"),
        Attendee::named(AttendeeId(Uuid::from_u128(11)), "Blob Jr"),
    ];
    sync_up.meetings = vec![Meeting {
        id: MeetingId(Uuid::from_u128(20)),
        date_epoch_ms: 1_700_000_000_000,
        transcript: "Hello".to_string(),
    }];
    sync_up
}

fn detail(shared: &SharedSyncUps) -> SyncUpDetailState {
    let reference = shared
        .element(SyncUpId(Uuid::from_u128(1)))
        .expect("sync-up should exist");
    SyncUpDetailState::new(reference)
}

#[test]
fn edit_then_done_writes_through_shared_collection() {
    let shared = SharedSyncUps::in_memory(vec![sync_up()]);
    let env = env();
    let mut state = detail(&shared);

    state.reduce(SyncUpDetailAction::EditButtonTapped, &env);
    assert_eq!(state.edit_form().map(|form| &form.sync_up), Some(&sync_up()));

    state.reduce(
        SyncUpDetailAction::Edit(SyncUpFormAction::SetTitle("Blob's Meeting".to_string())),
        &env,
    );
    assert_eq!(shared.get()[0].title, "Design");

    let effect = state.reduce(SyncUpDetailAction::DoneEditButtonTapped, &env);
    assert!(effect.is_none());
    assert!(state.destination.is_none());
    assert_eq!(shared.get()[0].title, "Blob's Meeting");
    assert_eq!(shared.get()[0].meetings, sync_up().meetings);
}

#[test]
fn cancel_edit_discards_changes() {
    let shared = SharedSyncUps::in_memory(vec![sync_up()]);
    let env = env();
    let mut state = detail(&shared);

    state.reduce(SyncUpDetailAction::EditButtonTapped, &env);
    state.reduce(
        SyncUpDetailAction::Edit(SyncUpFormAction::SetDuration(600)),
        &env,
    );
    state.reduce(SyncUpDetailAction::CancelEditButtonTapped, &env);

    assert!(state.destination.is_none());
    assert_eq!(shared.get(), vec![sync_up()]);
    assert_eq!(shared.revision(), 0);
}

#[test]
fn done_with_invalid_draft_keeps_editing() {
    let shared = SharedSyncUps::in_memory(vec![sync_up()]);
    let env = env();
    let mut state = detail(&shared);

    state.reduce(SyncUpDetailAction::EditButtonTapped, &env);
    state.reduce(SyncUpDetailAction::Edit(SyncUpFormAction::SetDuration(0)), &env);
    state.reduce(SyncUpDetailAction::DoneEditButtonTapped, &env);

    assert!(state.edit_form().is_some());
    assert_eq!(shared.get()[0].duration_secs, 60);
}

#[test]
fn delete_asks_for_confirmation_first() {
    let shared = SharedSyncUps::in_memory(vec![sync_up()]);
    let env = env();
    let mut state = detail(&shared);

    state.reduce(SyncUpDetailAction::DeleteButtonTapped, &env);

    let Some(DetailDestination::Alert(alert)) = state.destination.as_ref() else {
        panic!("expected delete alert");
    };
    assert_eq!(alert.title, "Delete?");
    assert_eq!(alert.buttons.len(), 2);
    assert_eq!(alert.buttons[0].role, ButtonRole::Destructive);
    assert_eq!(alert.buttons[0].action, Some(DetailAlertAction::ConfirmDeletion));
    assert_eq!(shared.len(), 1);
}

#[test]
fn confirming_deletion_removes_and_dismisses() {
    let shared = SharedSyncUps::in_memory(vec![sync_up()]);
    let env = env();
    let mut state = detail(&shared);

    state.reduce(SyncUpDetailAction::DeleteButtonTapped, &env);
    let effect = state.reduce(
        SyncUpDetailAction::Alert(AlertAction::Presented(DetailAlertAction::ConfirmDeletion)),
        &env,
    );

    assert_eq!(effect, Effect::Dismiss);
    assert!(shared.is_empty());
    assert!(state.destination.is_none());
}

#[test]
fn dismissing_alert_keeps_sync_up() {
    let shared = SharedSyncUps::in_memory(vec![sync_up()]);
    let env = env();
    let mut state = detail(&shared);

    state.reduce(SyncUpDetailAction::DeleteButtonTapped, &env);
    state.reduce(SyncUpDetailAction::Alert(AlertAction::Dismissed), &env);

    assert!(state.destination.is_none());
    assert_eq!(shared.len(), 1);

    let stray = state.reduce(
        SyncUpDetailAction::Alert(AlertAction::Presented(DetailAlertAction::ConfirmDeletion)),
        &env,
    );
    assert!(stray.is_none());
    assert_eq!(shared.len(), 1);
}

#[test]
fn meeting_tapped_delegates_snapshot() {
    let shared = SharedSyncUps::in_memory(vec![sync_up()]);
    let env = env();
    let mut state = detail(&shared);

    let effect = state.reduce(
        SyncUpDetailAction::MeetingTapped(MeetingId(Uuid::from_u128(20))),
        &env,
    );
    assert_eq!(
        effect,
        Effect::Delegate(SyncUpDetailDelegate::OpenMeeting {
            meeting: sync_up().meetings[0].clone(),
            sync_up: sync_up(),
        })
    );

    let unknown = state.reduce(
        SyncUpDetailAction::MeetingTapped(MeetingId(Uuid::from_u128(21))),
        &env,
    );
    assert!(unknown.is_none());
}

#[test]
fn start_meeting_delegates_live_reference() {
    let shared = SharedSyncUps::in_memory(vec![sync_up()]);
    let env = env();
    let mut state = detail(&shared);

    let effect = state.reduce(SyncUpDetailAction::StartMeetingButtonTapped, &env);
    let Effect::Delegate(SyncUpDetailDelegate::StartMeeting(reference)) = effect else {
        panic!("expected start-meeting delegate");
    };
    assert_eq!(reference.id(), sync_up().id);
    assert!(reference.collection().ptr_eq(&shared));
}

#[test]
fn removed_sync_up_cannot_be_edited_or_started() {
    let shared = SharedSyncUps::in_memory(vec![sync_up()]);
    let env = env();
    let mut state = detail(&shared);
    shared.remove(sync_up().id);

    state.reduce(SyncUpDetailAction::EditButtonTapped, &env);
    assert!(state.destination.is_none());

    let effect = state.reduce(SyncUpDetailAction::StartMeetingButtonTapped, &env);
    assert!(effect.is_none());
}
