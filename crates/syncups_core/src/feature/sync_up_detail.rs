//! Detail screen for one sync-up.
//!
//! # Responsibility
//! - Present a live sync-up with its meeting history.
//! - Host the edit form and the delete confirmation as mutually exclusive
//!   destinations.
//!
//! # Invariants
//! - Deletion always goes through the confirmation alert.
//! - Committing an edit replaces the shared value wholesale.
//! - The recorder is handed the live reference, the meeting viewer a snapshot.

use super::alert::{AlertAction, AlertState, ButtonRole};
use super::sync_up_form::{SyncUpFormAction, SyncUpFormState};
use super::{Effect, Feature};
use crate::deps::Environment;
use crate::model::sync_up::{Meeting, MeetingId, SyncUp};
use crate::shared::SyncUpRef;
use log::{debug, info, warn};

/// Action carried by the delete confirmation alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailAlertAction {
    ConfirmDeletion,
}

/// Presented child of the detail screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailDestination {
    Alert(AlertState<DetailAlertAction>),
    Edit(SyncUpFormState),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncUpDetailState {
    pub sync_up: SyncUpRef,
    pub destination: Option<DetailDestination>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncUpDetailAction {
    CancelEditButtonTapped,
    DeleteButtonTapped,
    DoneEditButtonTapped,
    EditButtonTapped,
    MeetingTapped(MeetingId),
    StartMeetingButtonTapped,
    Alert(AlertAction<DetailAlertAction>),
    Edit(SyncUpFormAction),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyncUpDetailDelegate {
    /// Show a read-only meeting with a snapshot of its sync-up.
    OpenMeeting { meeting: Meeting, sync_up: SyncUp },
    /// Run a meeting against the live sync-up.
    StartMeeting(SyncUpRef),
}

/// "Delete?" confirmation shown before removing a sync-up.
pub fn delete_sync_up_alert() -> AlertState<DetailAlertAction> {
    AlertState::new("Delete?", "Are you sure you want to delete this meeting?")
        .button(
            "Yes",
            ButtonRole::Destructive,
            Some(DetailAlertAction::ConfirmDeletion),
        )
        .button("Nevermind", ButtonRole::Cancel, None)
}

impl SyncUpDetailState {
    pub fn new(sync_up: SyncUpRef) -> Self {
        Self {
            sync_up,
            destination: None,
        }
    }

    /// Edit form, when that destination is active.
    pub fn edit_form(&self) -> Option<&SyncUpFormState> {
        match self.destination.as_ref() {
            Some(DetailDestination::Edit(form)) => Some(form),
            _ => None,
        }
    }
}

impl Feature for SyncUpDetailState {
    type Action = SyncUpDetailAction;
    type Delegate = SyncUpDetailDelegate;

    fn reduce(
        &mut self,
        action: SyncUpDetailAction,
        env: &Environment,
    ) -> Effect<SyncUpDetailDelegate> {
        match action {
            SyncUpDetailAction::CancelEditButtonTapped => {
                self.destination = None;
                Effect::None
            }
            SyncUpDetailAction::DeleteButtonTapped => {
                self.destination = Some(DetailDestination::Alert(delete_sync_up_alert()));
                Effect::None
            }
            SyncUpDetailAction::DoneEditButtonTapped => {
                let Some(form) = self.edit_form() else {
                    return Effect::None;
                };
                if let Err(err) = form.sync_up.validate() {
                    warn!(
                        "event=sync_up_edit module=detail status=rejected sync_up_id={} error={}",
                        self.sync_up.id(),
                        err
                    );
                    return Effect::None;
                }
                let edited = form.sync_up.clone();
                self.destination = None;
                if self.sync_up.set(edited) {
                    info!(
                        "event=sync_up_edit module=detail status=ok sync_up_id={}",
                        self.sync_up.id()
                    );
                }
                Effect::None
            }
            SyncUpDetailAction::EditButtonTapped => {
                match self.sync_up.get() {
                    Some(current) => {
                        self.destination =
                            Some(DetailDestination::Edit(SyncUpFormState::new(current, env)));
                    }
                    None => warn!(
                        "event=sync_up_edit module=detail status=ignored reason=not_found sync_up_id={}",
                        self.sync_up.id()
                    ),
                }
                Effect::None
            }
            SyncUpDetailAction::MeetingTapped(meeting_id) => {
                let Some(sync_up) = self.sync_up.get() else {
                    return Effect::None;
                };
                match sync_up.meetings.iter().find(|m| m.id == meeting_id).cloned() {
                    Some(meeting) => {
                        Effect::Delegate(SyncUpDetailDelegate::OpenMeeting { meeting, sync_up })
                    }
                    None => {
                        debug!(
                            "event=meeting_open module=detail status=ignored reason=not_found meeting_id={}",
                            meeting_id
                        );
                        Effect::None
                    }
                }
            }
            SyncUpDetailAction::StartMeetingButtonTapped => {
                if self.sync_up.exists() {
                    Effect::Delegate(SyncUpDetailDelegate::StartMeeting(self.sync_up.clone()))
                } else {
                    Effect::None
                }
            }
            SyncUpDetailAction::Alert(AlertAction::Presented(DetailAlertAction::ConfirmDeletion)) => {
                if !matches!(self.destination, Some(DetailDestination::Alert(_))) {
                    return Effect::None;
                }
                self.destination = None;
                if self.sync_up.remove().is_some() {
                    info!(
                        "event=sync_up_delete module=detail status=ok sync_up_id={}",
                        self.sync_up.id()
                    );
                }
                Effect::Dismiss
            }
            SyncUpDetailAction::Alert(AlertAction::Dismissed) => {
                if matches!(self.destination, Some(DetailDestination::Alert(_))) {
                    self.destination = None;
                }
                Effect::None
            }
            SyncUpDetailAction::Edit(form_action) => {
                if let Some(DetailDestination::Edit(form)) = self.destination.as_mut() {
                    form.reduce(form_action, env);
                }
                Effect::None
            }
        }
    }
}
