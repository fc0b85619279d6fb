//! Screen state machines.
//!
//! # Responsibility
//! - Define one reducer per screen: list, form, detail, record-meeting.
//! - Return side effects and delegate messages as values; reducers never
//!   spawn work or navigate themselves.
//!
//! # Invariants
//! - A reducer call is a pure function of (state, action, environment) plus
//!   writes through the shared collection.
//! - Actions that do not apply to the current state are ignored, never
//!   panics.

pub mod alert;
pub mod record_meeting;
pub mod sync_up_detail;
pub mod sync_up_form;
pub mod sync_ups_list;

use crate::deps::Environment;
use std::time::Duration;

/// A screen reducer.
pub trait Feature {
    type Action;
    /// Outbound messages for the parent (navigation controller).
    type Delegate;

    fn reduce(&mut self, action: Self::Action, env: &Environment) -> Effect<Self::Delegate>;
}

/// What a transition asks the runtime to do next.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect<D> {
    None,
    /// Hand a message to the parent.
    Delegate(D),
    /// Tear this screen down.
    Dismiss,
    /// Start delivering a tick action every `interval`.
    StartTimer(Duration),
    /// Stop a running tick stream.
    CancelTimer,
}

impl<D> Effect<D> {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}
