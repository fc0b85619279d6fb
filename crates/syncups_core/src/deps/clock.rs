//! Wall-clock time and periodic tick streams.
//!
//! # Invariants
//! - A tick stream yields nothing before its first full interval elapses.
//! - Dropping a tick stream stops its ticks; no background work outlives it.

use futures::stream::{BoxStream, StreamExt};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_stream::wrappers::{IntervalStream, UnboundedReceiverStream};

/// Cancellable stream of periodic ticks.
pub type TickStream = BoxStream<'static, ()>;

pub trait Clock: Send + Sync {
    /// Current time as Unix epoch milliseconds.
    fn now_epoch_ms(&self) -> i64;

    /// Ticks once per `interval` until the stream is dropped.
    ///
    /// Must be polled inside a tokio runtime.
    fn ticks(&self, interval: Duration) -> TickStream;
}

/// Real time backed by `SystemTime` and `tokio::time`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0)
    }

    fn ticks(&self, interval: Duration) -> TickStream {
        let mut timer = interval_at(Instant::now() + interval, interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        IntervalStream::new(timer).map(|_| ()).boxed()
    }
}

/// Manually driven clock for tests.
///
/// `now_epoch_ms` returns a settable instant; every stream handed out by
/// `ticks` receives one item per call to [`FakeClock::tick`], regardless of
/// the requested interval.
#[derive(Debug, Default)]
pub struct FakeClock {
    now_ms: AtomicI64,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<()>>>,
}

impl FakeClock {
    pub fn new(now_epoch_ms: i64) -> Self {
        Self {
            now_ms: AtomicI64::new(now_epoch_ms),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub fn set_now(&self, epoch_ms: i64) {
        self.now_ms.store(epoch_ms, Ordering::SeqCst);
    }

    /// Delivers one tick to every live stream; returns how many received it.
    pub fn tick(&self) -> usize {
        let mut subscribers = self.lock_subscribers();
        subscribers.retain(|tx| tx.send(()).is_ok());
        subscribers.len()
    }

    /// Streams that are still being listened to.
    pub fn active_subscriptions(&self) -> usize {
        let mut subscribers = self.lock_subscribers();
        subscribers.retain(|tx| !tx.is_closed());
        subscribers.len()
    }

    fn lock_subscribers(&self) -> std::sync::MutexGuard<'_, Vec<mpsc::UnboundedSender<()>>> {
        match self.subscribers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Clock for FakeClock {
    fn now_epoch_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }

    fn ticks(&self, _interval: Duration) -> TickStream {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock_subscribers().push(tx);
        UnboundedReceiverStream::new(rx).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, FakeClock, SystemClock};
    use futures::StreamExt;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn system_clock_ticks_after_each_interval() {
        let mut ticks = SystemClock.ticks(Duration::from_secs(1));
        let started = tokio::time::Instant::now();

        ticks.next().await.expect("first tick");
        assert_eq!(started.elapsed(), Duration::from_secs(1));
        ticks.next().await.expect("second tick");
        assert_eq!(started.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test]
    async fn fake_clock_delivers_manual_ticks_until_dropped() {
        let clock = FakeClock::new(42);
        assert_eq!(clock.now_epoch_ms(), 42);

        let mut ticks = clock.ticks(Duration::from_secs(1));
        assert_eq!(clock.tick(), 1);
        assert_eq!(ticks.next().await, Some(()));

        drop(ticks);
        assert_eq!(clock.active_subscriptions(), 0);
        assert_eq!(clock.tick(), 0);
    }
}
