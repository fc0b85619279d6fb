//! Flutter-facing bindings for the sync-ups core.

pub mod api;
