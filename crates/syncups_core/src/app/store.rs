//! Serial action processor and effect runner.
//!
//! # Responsibility
//! - Apply actions to `AppState` one at a time.
//! - Run timer effects as tokio tasks that feed actions back into the same
//!   queue as user input.
//!
//! # Invariants
//! - State is only mutated inside `send`; effect tasks only enqueue actions.
//! - A timer task is owned by exactly one stack element. It is aborted when
//!   the element leaves the stack for any reason, when it is restarted, and
//!   when the store is dropped.
//! - Ticks already queued for a popped element are dropped on delivery,
//!   because element ids are never reused.
//! - Every action an effect task queues is followed by a wake-up on
//!   [`Store::action_signal`], so a host that cannot await [`Store::next`]
//!   while holding the store can still drain promptly.

use super::{AppAction, AppEffect, AppState, PathAction};
use super::stack::StackElementId;
use crate::deps::Environment;
use crate::feature::record_meeting::RecordMeetingAction;
use futures::StreamExt;
use log::{debug, info};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;

pub struct Store {
    state: AppState,
    env: Environment,
    runtime: Handle,
    inbox_tx: mpsc::UnboundedSender<AppAction>,
    inbox_rx: mpsc::UnboundedReceiver<AppAction>,
    queued: Arc<Notify>,
    timers: HashMap<StackElementId, JoinHandle<()>>,
}

impl Store {
    /// Creates a store whose effect tasks run on `runtime`.
    pub fn new(state: AppState, env: Environment, runtime: Handle) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        Self {
            state,
            env,
            runtime,
            inbox_tx,
            inbox_rx,
            queued: Arc::new(Notify::new()),
            timers: HashMap::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Applies `action` and starts or stops whatever it asks for.
    pub fn send(&mut self, action: AppAction) {
        let effects = self.state.reduce(action, &self.env);
        for effect in effects {
            match effect {
                AppEffect::StartTimer { element, interval } => self.start_timer(element, interval),
                AppEffect::CancelTimer { element } => self.cancel_timer(element),
            }
        }
        self.release_orphaned_timers();
    }

    /// Waits for the next effect-produced action and applies it.
    pub async fn next(&mut self) -> bool {
        match self.inbox_rx.recv().await {
            Some(action) => {
                self.send(action);
                true
            }
            None => false,
        }
    }

    /// Applies every effect-produced action that is already queued.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(action) = self.inbox_rx.try_recv() {
            self.send(action);
            applied += 1;
        }
        applied
    }

    /// Wakes once per action queued by an effect task. A wake-up with no
    /// waiter is kept, so none are lost between two [`drain`](Self::drain)s.
    pub fn action_signal(&self) -> Arc<Notify> {
        Arc::clone(&self.queued)
    }

    /// Number of timer tasks currently owned by stack elements.
    pub fn running_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn has_timer(&self, element: StackElementId) -> bool {
        self.timers.contains_key(&element)
    }

    fn start_timer(&mut self, element: StackElementId, interval: Duration) {
        self.cancel_timer(element);
        let clock = Arc::clone(&self.env.clock);
        let inbox = self.inbox_tx.clone();
        let queued = Arc::clone(&self.queued);
        let handle = self.runtime.spawn(async move {
            let mut ticks = clock.ticks(interval);
            while ticks.next().await.is_some() {
                let tick = AppAction::element(
                    element,
                    PathAction::RecordMeeting(RecordMeetingAction::TimerTick),
                );
                if inbox.send(tick).is_err() {
                    break;
                }
                queued.notify_one();
            }
        });
        info!(
            "event=timer_start module=store status=ok element={} interval_ms={}",
            element,
            interval.as_millis()
        );
        self.timers.insert(element, handle);
    }

    fn cancel_timer(&mut self, element: StackElementId) {
        if let Some(handle) = self.timers.remove(&element) {
            handle.abort();
            info!("event=timer_cancel module=store status=ok element={}", element);
        }
    }

    fn release_orphaned_timers(&mut self) {
        let orphaned = self
            .timers
            .keys()
            .copied()
            .filter(|element| !self.state.path.contains(*element))
            .collect::<Vec<_>>();
        for element in orphaned {
            debug!("event=timer_orphaned module=store status=cancel element={}", element);
            self.cancel_timer(element);
        }
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        for (_, handle) in self.timers.drain() {
            handle.abort();
        }
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("timers", &self.timers.len())
            .finish_non_exhaustive()
    }
}
