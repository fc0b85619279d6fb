//! Identity generation.

use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Source of fresh opaque identities.
pub trait IdGenerator: Send + Sync {
    fn new_id(&self) -> Uuid;
}

/// Random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn new_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Deterministic sequence `00000000-...-000`, `...-001`, ... for tests.
#[derive(Debug, Default)]
pub struct IncrementingIds {
    next: AtomicU64,
}

impl IncrementingIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// The UUID this generator yields as its `n`-th value (zero-based).
    pub fn nth(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }
}

impl IdGenerator for IncrementingIds {
    fn new_id(&self) -> Uuid {
        Uuid::from_u128(u128::from(self.next.fetch_add(1, Ordering::SeqCst)))
    }
}
