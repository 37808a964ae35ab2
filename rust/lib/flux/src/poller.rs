use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// A boxed, `Send`-able future returned by poll tasks.
pub type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

type PollTask = Arc<dyn Fn() -> BoxFuture + Send + Sync>;

/// Cancellable periodic task keyed to an explicit active flag.
///
/// - Ticks fire every `interval` but only run the task while active.
/// - Switching from inactive to active runs the task immediately.
/// - A tick that finds the previous run still in flight is skipped.
/// - `stop()` (or dropping the poller) ends the loop; a run already in
///   flight is allowed to finish.
///
/// Must be started from within a tokio runtime.
pub struct Poller {
    shared: Arc<Shared>,
    cancel: CancellationToken,
}

struct Shared {
    active: AtomicBool,
    in_flight: AtomicBool,
    wake: Notify,
    task: PollTask,
}

impl Poller {
    /// Spawn the poll loop.
    pub fn start<F, Fut>(interval: Duration, active: bool, task: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let task: PollTask = Arc::new(move || -> BoxFuture { Box::pin(task()) });
        let shared = Arc::new(Shared {
            active: AtomicBool::new(active),
            in_flight: AtomicBool::new(false),
            wake: Notify::new(),
            task,
        });
        let cancel = CancellationToken::new();

        {
            let shared = Arc::clone(&shared);
            let cancel = cancel.clone();
            tokio::spawn(async move {
                info!("poller started (interval={interval:?}, active={active})");
                let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            info!("poller stopped");
                            break;
                        }
                        _ = shared.wake.notified() => {
                            if shared.active.load(Ordering::Acquire) {
                                Shared::spawn_run(&shared, "wake");
                            }
                        }
                        _ = ticker.tick() => {
                            if shared.active.load(Ordering::Acquire) {
                                Shared::spawn_run(&shared, "interval");
                            }
                        }
                    }
                }
            });
        }

        Self { shared, cancel }
    }

    /// Gate the poller. Returns the previous value.
    ///
    /// Becoming active wakes the loop for an immediate run.
    pub fn set_active(&self, active: bool) -> bool {
        let was = self.shared.active.swap(active, Ordering::AcqRel);
        if active && !was {
            debug!("poller resumed");
            self.shared.wake.notify_one();
        } else if !active && was {
            debug!("poller suspended");
        }
        was
    }

    pub fn is_active(&self) -> bool {
        self.shared.active.load(Ordering::Acquire)
    }

    /// Whether a run is currently in flight.
    pub fn is_running(&self) -> bool {
        self.shared.in_flight.load(Ordering::Acquire)
    }

    /// Request an immediate run (ignored while inactive or in flight).
    pub fn trigger(&self) {
        self.shared.wake.notify_one();
    }

    /// Run the task now on the caller's task, honouring the in-flight
    /// guard but not the active flag. Returns `false` if skipped.
    pub async fn run_now(&self) -> bool {
        Shared::run(&self.shared, "manual").await
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl Shared {
    fn spawn_run(shared: &Arc<Shared>, reason: &'static str) {
        let shared = Arc::clone(shared);
        tokio::spawn(async move {
            Shared::run(&shared, reason).await;
        });
    }

    async fn run(shared: &Arc<Shared>, reason: &'static str) -> bool {
        if shared.in_flight.swap(true, Ordering::AcqRel) {
            debug!(reason, "poll skipped: previous run still in flight");
            return false;
        }
        let _guard = InFlight(shared.as_ref());
        debug!(reason, "poll run");
        (shared.task)().await;
        true
    }
}

/// Clears the in-flight flag even if the task panics.
struct InFlight<'a>(&'a Shared);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.in_flight.store(false, Ordering::Release);
    }
}
