//! Domain model for sync-ups, attendees, meetings and themes.
//!
//! # Responsibility
//! - Define the value types shared by every screen state machine.
//! - Define the persisted record shape of the sync-ups document.
//!
//! # Invariants
//! - Every entity is identified by a stable, typed UUID.
//! - Equality is structural; entities carry no hidden state.
//! - A sync-up's meeting list is most-recent-first and only ever prepended to.

pub mod sync_up;
pub mod theme;
