//! Sync-up edit form.
//!
//! # Responsibility
//! - Hold a working copy of a sync-up while it is added or edited.
//! - Track which field has input focus.
//!
//! # Invariants
//! - The working sync-up always has at least one attendee.
//! - Removing the focused attendee moves focus to the attendee now at
//!   `min(first_removed_index, count - 1)`.
//! - The form never persists anything; its parent reads `sync_up` on confirm.

use super::{Effect, Feature};
use crate::deps::Environment;
use crate::model::sync_up::{Attendee, AttendeeId, SyncUp};
use crate::model::theme::Theme;
use log::debug;
use std::collections::BTreeSet;
use std::convert::Infallible;

/// Focusable input of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Title,
    Attendee(AttendeeId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncUpFormState {
    pub focus: Option<FormField>,
    pub sync_up: SyncUp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncUpFormAction {
    AddAttendeeButtonTapped,
    /// Removes attendees at the given positions.
    DeleteAttendees(BTreeSet<usize>),
    SetTitle(String),
    SetDuration(u64),
    SetTheme(Theme),
    SetAttendeeName { id: AttendeeId, name: String },
    SetFocus(Option<FormField>),
    /// Replaces the working sync-up wholesale.
    Binding(SyncUp),
}

impl SyncUpFormState {
    /// Opens a form on `sync_up` with the title focused.
    pub fn new(sync_up: SyncUp, env: &Environment) -> Self {
        Self::with_focus(Some(FormField::Title), sync_up, env)
    }

    pub fn with_focus(focus: Option<FormField>, sync_up: SyncUp, env: &Environment) -> Self {
        let mut state = Self { focus, sync_up };
        state.ensure_attendee(env);
        state
    }

    fn ensure_attendee(&mut self, env: &Environment) {
        if self.sync_up.attendees.is_empty() {
            self.sync_up
                .attendees
                .push(Attendee::blank(AttendeeId(env.ids.new_id())));
        }
    }

    fn delete_attendees(&mut self, offsets: &BTreeSet<usize>, env: &Environment) {
        let count = self.sync_up.attendees.len();
        let Some(&first_removed) = offsets.iter().find(|&&offset| offset < count) else {
            return;
        };

        let focused_was_removed = match self.focus {
            Some(FormField::Attendee(focused)) => self
                .sync_up
                .attendee_index(focused)
                .is_some_and(|index| offsets.contains(&index)),
            _ => false,
        };

        for &offset in offsets.iter().rev() {
            if offset < self.sync_up.attendees.len() {
                self.sync_up.attendees.remove(offset);
            }
        }
        self.ensure_attendee(env);

        if focused_was_removed {
            let remaining = self.sync_up.attendees.len();
            self.focus = remaining
                .checked_sub(1)
                .map(|last| first_removed.min(last))
                .map(|index| FormField::Attendee(self.sync_up.attendees[index].id));
        }
    }
}

impl Feature for SyncUpFormState {
    type Action = SyncUpFormAction;
    type Delegate = Infallible;

    fn reduce(&mut self, action: SyncUpFormAction, env: &Environment) -> Effect<Infallible> {
        match action {
            SyncUpFormAction::AddAttendeeButtonTapped => {
                let attendee = Attendee::blank(AttendeeId(env.ids.new_id()));
                self.focus = Some(FormField::Attendee(attendee.id));
                self.sync_up.attendees.push(attendee);
            }
            SyncUpFormAction::DeleteAttendees(offsets) => self.delete_attendees(&offsets, env),
            SyncUpFormAction::SetTitle(title) => self.sync_up.title = title,
            SyncUpFormAction::SetDuration(secs) => self.sync_up.duration_secs = secs,
            SyncUpFormAction::SetTheme(theme) => self.sync_up.theme = theme,
            SyncUpFormAction::SetAttendeeName { id, name } => {
                match self.sync_up.attendee_mut(id) {
                    Some(attendee) => attendee.name = name,
                    None => debug!(
                        "event=form_edit module=form status=ignored reason=unknown_attendee attendee_id={}",
                        id
                    ),
                }
            }
            SyncUpFormAction::SetFocus(focus) => self.focus = focus,
            SyncUpFormAction::Binding(sync_up) => {
                self.sync_up = sync_up;
                self.ensure_attendee(env);
                if let Some(FormField::Attendee(id)) = self.focus {
                    if self.sync_up.attendee_index(id).is_none() {
                        self.focus = None;
                    }
                }
            }
        }
        Effect::None
    }
}

#[cfg(test)]
mod tests {
    use super::{FormField, SyncUpFormAction, SyncUpFormState};
    use crate::deps::clock::FakeClock;
    use crate::deps::ids::IncrementingIds;
    use crate::deps::Environment;
    use crate::feature::Feature;
    use crate::model::sync_up::{Attendee, AttendeeId, SyncUp, SyncUpId};
    use std::collections::BTreeSet;
    use std::sync::Arc;
    use uuid::Uuid;

    fn env() -> Environment {
        Environment::new(Arc::new(IncrementingIds::new()), Arc::new(FakeClock::new(0)))
    }

    fn attendee(n: u128) -> Attendee {
        Attendee::blank(AttendeeId(Uuid::from_u128(1000 + n)))
    }

    #[test]
    fn deleting_middle_focused_attendee_keeps_index() {
        let env = env();
        let attendees = vec![attendee(1), attendee(2), attendee(3)];
        let mut sync_up = SyncUp::new(SyncUpId(Uuid::nil()));
        sync_up.attendees = attendees.clone();
        let mut form =
            SyncUpFormState::with_focus(Some(FormField::Attendee(attendees[1].id)), sync_up, &env);

        form.reduce(SyncUpFormAction::DeleteAttendees(BTreeSet::from([1])), &env);
        assert_eq!(form.focus, Some(FormField::Attendee(attendees[2].id)));
    }

    #[test]
    fn deleting_last_focused_attendee_clamps_to_new_last() {
        let env = env();
        let attendees = vec![attendee(1), attendee(2), attendee(3)];
        let mut sync_up = SyncUp::new(SyncUpId(Uuid::nil()));
        sync_up.attendees = attendees.clone();
        let mut form =
            SyncUpFormState::with_focus(Some(FormField::Attendee(attendees[2].id)), sync_up, &env);

        form.reduce(SyncUpFormAction::DeleteAttendees(BTreeSet::from([1, 2])), &env);
        assert_eq!(form.sync_up.attendees, vec![attendees[0].clone()]);
        assert_eq!(form.focus, Some(FormField::Attendee(attendees[0].id)));
    }

    #[test]
    fn out_of_range_delete_is_ignored() {
        let env = env();
        let mut form = SyncUpFormState::new(SyncUp::new(SyncUpId(Uuid::nil())), &env);
        let before = form.clone();
        form.reduce(SyncUpFormAction::DeleteAttendees(BTreeSet::from([5])), &env);
        assert_eq!(form, before);
    }

    #[test]
    fn binding_restores_attendee_invariant() {
        let env = env();
        let mut form = SyncUpFormState::new(SyncUp::new(SyncUpId(Uuid::nil())), &env);
        let mut replacement = SyncUp::new(SyncUpId(Uuid::nil()));
        replacement.title = "Retro".to_string();

        form.reduce(SyncUpFormAction::Binding(replacement), &env);
        assert_eq!(form.sync_up.title, "Retro");
        assert_eq!(form.sync_up.attendees.len(), 1);
    }
}
