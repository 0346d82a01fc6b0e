//! Fixed-cadence polling loop that drains the task queue.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::MissedTickBehavior;

use crate::config::{DEFAULT_MAX_PENDING_WARN, DEFAULT_POLL_INTERVAL_MS};
use crate::core::TaskQueue;
use crate::runtime::Spawn;
use crate::util::clock::now_ms;

/// Recurring driver that drains a [`TaskQueue`] on a fixed cadence.
///
/// The cadence is static configuration, not derived from the soonest pending
/// due time, so the worst-case latency between a task becoming due and its
/// action firing is one interval. The driver never starts on its own;
/// [`PollDriver::start`] consumes it, making the Idle -> Running transition
/// happen exactly once.
pub struct PollDriver {
    queue: Arc<TaskQueue>,
    interval: Duration,
    max_pending_warn: usize,
}

impl PollDriver {
    /// Create a driver for `queue` with the given cadence.
    #[must_use]
    pub fn new(queue: Arc<TaskQueue>, interval: Duration) -> Self {
        Self {
            queue,
            interval,
            max_pending_warn: DEFAULT_MAX_PENDING_WARN,
        }
    }

    /// Create a driver with the reference 500 ms cadence.
    #[must_use]
    pub fn with_default_interval(queue: Arc<TaskQueue>) -> Self {
        Self::new(queue, Duration::from_millis(DEFAULT_POLL_INTERVAL_MS))
    }

    /// Override the pending-backlog size that triggers a warning log.
    #[must_use]
    pub fn with_backlog_warning(mut self, max_pending: usize) -> Self {
        self.max_pending_warn = max_pending;
        self
    }

    /// Start the polling loop on `spawner` and return its stop handle.
    ///
    /// The first drain runs immediately on activation; subsequent drains run
    /// once per interval. The loop ends when the handle is stopped or
    /// dropped; nothing else ends it.
    pub fn start(self, spawner: &impl Spawn) -> DriverHandle {
        let handle = DriverHandle {
            stopped: Arc::new(AtomicBool::new(false)),
            notify: Arc::new(Notify::new()),
        };
        let stopped = Arc::clone(&handle.stopped);
        let notify = Arc::clone(&handle.notify);
        let queue = self.queue;
        let interval = self.interval;
        let max_pending_warn = self.max_pending_warn;

        tracing::info!(interval_ms = interval.as_millis() as u64, "poll driver started");
        spawner.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    () = notify.notified() => break,
                    _ = ticker.tick() => {
                        if stopped.load(Ordering::Acquire) {
                            break;
                        }
                        queue.drain(now_ms());
                        let backlog = queue.len();
                        if backlog > max_pending_warn {
                            tracing::warn!(backlog, max_pending_warn, "pending task backlog");
                        }
                    }
                }
            }
            tracing::info!("poll driver stopped");
        });
        handle
    }
}

/// Stop handle for a running [`PollDriver`] loop.
///
/// Stopping is explicit and idempotent; dropping the handle also stops the
/// loop so a driver owned by a scope can never outlive it.
pub struct DriverHandle {
    stopped: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl DriverHandle {
    /// Stop the polling loop. Safe to call more than once.
    pub fn stop(&self) {
        if !self.stopped.swap(true, Ordering::AcqRel) {
            self.notify.notify_one();
        }
    }

    /// Whether the loop has been told to stop.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

impl Drop for DriverHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
