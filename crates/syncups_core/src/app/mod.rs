//! Root state machine: sync-ups list plus the navigation stack.
//!
//! # Responsibility
//! - Route actions to the list or to the stack element they address.
//! - Turn delegate messages into pushes and dismiss effects into pops.
//! - Translate screen timer effects into element-scoped runtime effects.
//!
//! # Invariants
//! - Actions for an element that is no longer on the stack are dropped.
//! - Every popped element yields a `CancelTimer` effect, whatever its kind.
//! - Popping never touches the shared collection; live references held by a
//!   popped screen simply go away.

pub mod stack;
pub mod store;

use crate::deps::Environment;
use crate::feature::record_meeting::{RecordMeetingAction, RecordMeetingState};
use crate::feature::sync_up_detail::{
    SyncUpDetailAction, SyncUpDetailDelegate, SyncUpDetailState,
};
use crate::feature::sync_ups_list::{SyncUpsListAction, SyncUpsListDelegate, SyncUpsListState};
use crate::feature::{Effect, Feature};
use crate::model::sync_up::{Meeting, SyncUp};
use crate::shared::SharedSyncUps;
use log::{debug, info, warn};
use stack::{StackElementId, StackState};
use std::time::Duration;

/// A pushed screen.
#[derive(Debug, Clone, PartialEq)]
pub enum Path {
    Detail(SyncUpDetailState),
    /// Read-only meeting viewer over snapshots.
    Meeting { meeting: Meeting, sync_up: SyncUp },
    RecordMeeting(RecordMeetingState),
}

impl Path {
    /// Short stable label, used in logs and by the FFI layer.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Detail(_) => "detail",
            Self::Meeting { .. } => "meeting",
            Self::RecordMeeting(_) => "record_meeting",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathAction {
    Detail(SyncUpDetailAction),
    RecordMeeting(RecordMeetingAction),
}

#[derive(Debug, Clone, PartialEq)]
pub enum StackAction {
    Element {
        id: StackElementId,
        action: PathAction,
    },
    Push(Path),
    Pop,
    PopFrom(StackElementId),
    PopAll,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    SyncUpsList(SyncUpsListAction),
    Path(StackAction),
}

impl AppAction {
    /// Shorthand for an action addressed to one stack element.
    pub fn element(id: StackElementId, action: PathAction) -> Self {
        Self::Path(StackAction::Element { id, action })
    }
}

/// Long-lived work the runtime must start or stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEffect {
    StartTimer {
        element: StackElementId,
        interval: Duration,
    },
    CancelTimer {
        element: StackElementId,
    },
}

#[derive(Debug)]
pub struct AppState {
    pub sync_ups_list: SyncUpsListState,
    pub path: StackState<Path>,
}

impl AppState {
    pub fn new(sync_ups: SharedSyncUps) -> Self {
        Self {
            sync_ups_list: SyncUpsListState::new(sync_ups),
            path: StackState::new(),
        }
    }

    pub fn sync_ups(&self) -> &SharedSyncUps {
        &self.sync_ups_list.sync_ups
    }

    /// Applies one action and returns the runtime effects it requests.
    pub fn reduce(&mut self, action: AppAction, env: &Environment) -> Vec<AppEffect> {
        let mut effects = Vec::new();
        match action {
            AppAction::SyncUpsList(list_action) => {
                match self.sync_ups_list.reduce(list_action, env) {
                    Effect::Delegate(SyncUpsListDelegate::OpenDetail(reference)) => {
                        let id = self
                            .path
                            .push(Path::Detail(SyncUpDetailState::new(reference)));
                        info!("event=navigate module=app status=ok kind=detail element={}", id);
                    }
                    Effect::None => {}
                    other => debug!(
                        "event=list_effect module=app status=ignored effect={:?}",
                        other
                    ),
                }
            }
            AppAction::Path(StackAction::Element { id, action }) => {
                self.reduce_element(id, action, env, &mut effects);
            }
            AppAction::Path(StackAction::Push(path)) => {
                let kind = path.kind();
                let id = self.path.push(path);
                info!("event=navigate module=app status=ok kind={} element={}", kind, id);
            }
            AppAction::Path(StackAction::Pop) => {
                if let Some((id, _)) = self.path.pop() {
                    effects.push(AppEffect::CancelTimer { element: id });
                }
            }
            AppAction::Path(StackAction::PopFrom(id)) => self.pop_from(id, &mut effects),
            AppAction::Path(StackAction::PopAll) => {
                for (id, _) in self.path.pop_all() {
                    effects.push(AppEffect::CancelTimer { element: id });
                }
            }
        }
        effects
    }

    fn reduce_element(
        &mut self,
        id: StackElementId,
        action: PathAction,
        env: &Environment,
        effects: &mut Vec<AppEffect>,
    ) {
        let Some(element) = self.path.get_mut(id) else {
            debug!(
                "event=element_action module=app status=ignored reason=not_on_stack element={}",
                id
            );
            return;
        };

        match (element, action) {
            (Path::Detail(detail), PathAction::Detail(action)) => {
                match detail.reduce(action, env) {
                    Effect::None => {}
                    Effect::Delegate(delegate) => self.handle_detail_delegate(delegate),
                    Effect::Dismiss => self.pop_from(id, effects),
                    Effect::StartTimer(interval) => effects.push(AppEffect::StartTimer {
                        element: id,
                        interval,
                    }),
                    Effect::CancelTimer => effects.push(AppEffect::CancelTimer { element: id }),
                }
            }
            (Path::RecordMeeting(record), PathAction::RecordMeeting(action)) => {
                match record.reduce(action, env) {
                    Effect::None => {}
                    Effect::Delegate(never) => match never {},
                    Effect::Dismiss => self.pop_from(id, effects),
                    Effect::StartTimer(interval) => effects.push(AppEffect::StartTimer {
                        element: id,
                        interval,
                    }),
                    Effect::CancelTimer => effects.push(AppEffect::CancelTimer { element: id }),
                }
            }
            (element, action) => warn!(
                "event=element_action module=app status=ignored reason=kind_mismatch element={} kind={} action={:?}",
                id,
                element.kind(),
                action
            ),
        }
    }

    fn handle_detail_delegate(&mut self, delegate: SyncUpDetailDelegate) {
        match delegate {
            SyncUpDetailDelegate::OpenMeeting { meeting, sync_up } => {
                let id = self.path.push(Path::Meeting { meeting, sync_up });
                info!("event=navigate module=app status=ok kind=meeting element={}", id);
            }
            SyncUpDetailDelegate::StartMeeting(reference) => {
                if !reference.exists() {
                    warn!(
                        "event=navigate module=app status=ignored reason=sync_up_removed sync_up_id={}",
                        reference.id()
                    );
                    return;
                }
                let id = self
                    .path
                    .push(Path::RecordMeeting(RecordMeetingState::new(reference)));
                info!(
                    "event=navigate module=app status=ok kind=record_meeting element={}",
                    id
                );
            }
        }
    }

    fn pop_from(&mut self, id: StackElementId, effects: &mut Vec<AppEffect>) {
        for (removed, path) in self.path.pop_from(id) {
            debug!(
                "event=pop module=app status=ok kind={} element={}",
                path.kind(),
                removed
            );
            effects.push(AppEffect::CancelTimer { element: removed });
        }
    }
}
