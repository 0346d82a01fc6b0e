//! Scheduled task and the single-shot invalidation capability.

use std::fmt;
use std::time::SystemTime;

use uuid::Uuid;

use crate::core::{AppResult, SchedulerError};
use crate::util::clock;

/// Stable identifier assigned to every task at construction.
///
/// Used for cancellation and debugging; never affects scheduling order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TaskId(Uuid);

impl TaskId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Single-shot capability invoked when a task's due time passes.
///
/// The action is exclusively owned by the queue and consumed on invocation,
/// so the type system enforces at-most-once execution. The typical
/// implementation marks a named cached resource stale
/// (see [`crate::infra::Invalidator`]); the scheduler never inspects what the
/// action does.
///
/// A blanket implementation covers plain closures:
///
/// ```rust,ignore
/// queue.schedule_after(|| { counter.fetch_add(1, Ordering::SeqCst); Ok(()) }, 1.5)?;
/// ```
pub trait Invalidate: Send + 'static {
    /// Consume the capability and perform the invalidation.
    ///
    /// Failures are reported by the drain loop and isolated per task; they
    /// are never retried. An action that wants retry semantics must
    /// reschedule itself through a queue handle it captured.
    fn invalidate(self: Box<Self>) -> AppResult<()>;
}

impl<F> Invalidate for F
where
    F: FnOnce() -> AppResult<()> + Send + 'static,
{
    fn invalidate(self: Box<Self>) -> AppResult<()> {
        (self)()
    }
}

/// A deferred task: an action plus the absolute time it becomes due.
///
/// The due time is resolved to epoch milliseconds at construction, so a task
/// that exists is always fireable; unresolvable times never enter the queue.
pub struct ScheduledTask {
    /// Stable identifier for cancellation/debugging.
    pub id: TaskId,
    /// Single-shot invalidation action; consumed when the task fires.
    pub action: Box<dyn Invalidate>,
    /// Absolute due time in milliseconds since the Unix epoch.
    pub due_at_ms: u128,
}

impl ScheduledTask {
    /// Build a task due at an absolute wall-clock time.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::InvalidSchedule`] if `due_at` precedes the Unix
    /// epoch and therefore cannot be resolved to a due time.
    pub fn new(action: impl Invalidate, due_at: SystemTime) -> Result<Self, SchedulerError> {
        Ok(Self {
            id: TaskId::generate(),
            action: Box::new(action),
            due_at_ms: clock::to_epoch_ms(due_at)?,
        })
    }

    /// Build a task due `delay_seconds` from now.
    ///
    /// Fractional, zero, and negative delays are legal; zero and negative
    /// delays produce a task due on the very next drain.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::InvalidSchedule`] if the delay is not a finite
    /// number.
    pub fn after(action: impl Invalidate, delay_seconds: f64) -> Result<Self, SchedulerError> {
        Ok(Self {
            id: TaskId::generate(),
            action: Box::new(action),
            due_at_ms: clock::after_seconds(delay_seconds)?,
        })
    }

    /// Whether this task is due at the supplied snapshot time.
    #[must_use]
    pub fn is_due(&self, now_ms: u128) -> bool {
        self.due_at_ms <= now_ms
    }
}

impl fmt::Debug for ScheduledTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduledTask")
            .field("id", &self.id)
            .field("due_at_ms", &self.due_at_ms)
            .finish_non_exhaustive()
    }
}
