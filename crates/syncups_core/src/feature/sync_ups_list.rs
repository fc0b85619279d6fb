//! Root list of sync-ups with the add-sync-up sheet.
//!
//! # Invariants
//! - Confirming an add appends at the tail of the shared collection only
//!   when the draft validates; otherwise the sheet stays open.
//! - Deletion by offset is immediate; there is no confirmation at this level.
//! - Selecting a row never pushes directly; it delegates a live reference.

use super::sync_up_form::{SyncUpFormAction, SyncUpFormState};
use super::{Effect, Feature};
use crate::deps::Environment;
use crate::model::sync_up::{SyncUp, SyncUpId};
use crate::shared::{SharedSyncUps, SyncUpRef};
use log::{debug, info, warn};
use std::collections::BTreeSet;

#[derive(Debug)]
pub struct SyncUpsListState {
    pub sync_ups: SharedSyncUps,
    /// Present while the add sheet is open.
    pub add_sync_up: Option<SyncUpFormState>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncUpsListAction {
    AddSyncUpButtonTapped,
    AddSyncUp(SyncUpFormAction),
    ConfirmAddButtonTapped,
    DiscardButtonTapped,
    Delete(BTreeSet<usize>),
    SyncUpTapped(SyncUpId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyncUpsListDelegate {
    OpenDetail(SyncUpRef),
}

impl SyncUpsListState {
    pub fn new(sync_ups: SharedSyncUps) -> Self {
        Self {
            sync_ups,
            add_sync_up: None,
        }
    }
}

impl Feature for SyncUpsListState {
    type Action = SyncUpsListAction;
    type Delegate = SyncUpsListDelegate;

    fn reduce(&mut self, action: SyncUpsListAction, env: &Environment) -> Effect<SyncUpsListDelegate> {
        match action {
            SyncUpsListAction::AddSyncUpButtonTapped => {
                let draft = SyncUp::new(SyncUpId(env.ids.new_id()));
                self.add_sync_up = Some(SyncUpFormState::new(draft, env));
                Effect::None
            }
            SyncUpsListAction::AddSyncUp(form_action) => {
                match self.add_sync_up.as_mut() {
                    Some(form) => {
                        form.reduce(form_action, env);
                    }
                    None => debug!("event=list_form_action module=list status=ignored reason=no_form"),
                }
                Effect::None
            }
            SyncUpsListAction::ConfirmAddButtonTapped => {
                let Some(form) = self.add_sync_up.as_ref() else {
                    return Effect::None;
                };
                if let Err(err) = form.sync_up.validate() {
                    warn!(
                        "event=sync_up_add module=list status=rejected sync_up_id={} error={}",
                        form.sync_up.id, err
                    );
                    return Effect::None;
                }
                let draft = form.sync_up.clone();
                self.add_sync_up = None;
                let id = draft.id;
                if self.sync_ups.append(draft) {
                    info!("event=sync_up_add module=list status=ok sync_up_id={}", id);
                } else {
                    warn!(
                        "event=sync_up_add module=list status=ignored reason=duplicate_id sync_up_id={}",
                        id
                    );
                }
                Effect::None
            }
            SyncUpsListAction::DiscardButtonTapped => {
                self.add_sync_up = None;
                Effect::None
            }
            SyncUpsListAction::Delete(offsets) => {
                let removed = self.sync_ups.remove_at(&offsets);
                info!(
                    "event=sync_up_delete module=list status=ok requested={} removed={}",
                    offsets.len(),
                    removed.len()
                );
                Effect::None
            }
            SyncUpsListAction::SyncUpTapped(id) => match self.sync_ups.element(id) {
                Some(reference) => Effect::Delegate(SyncUpsListDelegate::OpenDetail(reference)),
                None => {
                    warn!(
                        "event=sync_up_open module=list status=ignored reason=not_found sync_up_id={}",
                        id
                    );
                    Effect::None
                }
            },
        }
    }
}
