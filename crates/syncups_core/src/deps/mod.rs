//! Injectable collaborators used by the state machines.
//!
//! # Responsibility
//! - Abstract identity generation and time so transitions are deterministic
//!   under test.
//!
//! # Invariants
//! - State machines never call `Uuid::new_v4` or read the system clock
//!   directly; they go through `Environment`.

pub mod clock;
pub mod ids;

use clock::{Clock, SystemClock};
use ids::{IdGenerator, RandomIds};
use std::sync::Arc;

/// Dependencies handed to every reducer call.
#[derive(Clone)]
pub struct Environment {
    pub ids: Arc<dyn IdGenerator>,
    pub clock: Arc<dyn Clock>,
}

impl Environment {
    pub fn new(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self { ids, clock }
    }

    /// Random v4 ids and wall-clock time.
    pub fn live() -> Self {
        Self::new(Arc::new(RandomIds), Arc::new(SystemClock))
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment").finish_non_exhaustive()
    }
}
