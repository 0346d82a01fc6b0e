//! The pending-task queue and its draining algorithm.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::SystemTime;

use parking_lot::Mutex;

use crate::core::{Invalidate, ScheduledTask, SchedulerError, TaskId};

/// Unordered multiset of pending deferred tasks.
///
/// The queue is the sole owner of the pending set. Producers call
/// [`TaskQueue::schedule`] / [`TaskQueue::schedule_after`]; the polling
/// driver calls [`TaskQueue::drain`]; nothing else touches the set.
///
/// Tasks are never deduplicated: two entries with identical actions and due
/// times fire independently, once each.
///
/// The pending set lives behind a `parking_lot::Mutex`, so `schedule` and
/// `cancel` calls arriving while a drain is in progress are safe: they land
/// in the set and are picked up by a future drain. The lock is released
/// before any due action runs, so an action may schedule follow-up work
/// through a queue handle it captured without deadlocking.
#[derive(Default)]
pub struct TaskQueue {
    pending: Mutex<Vec<ScheduledTask>>,
}

impl TaskQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a task to the pending set.
    ///
    /// Fire-and-forget from the caller's perspective: once this returns
    /// `Ok`, the task will fire on the first drain at or after its due time.
    /// The returned [`TaskId`] can be used with [`TaskQueue::cancel`].
    ///
    /// # Errors
    ///
    /// Construction of a [`ScheduledTask`] already validates the due time,
    /// so `schedule` itself is infallible today; it returns `Result` so the
    /// scheduling contract stays uniform across the convenience helpers.
    pub fn schedule(&self, task: ScheduledTask) -> Result<TaskId, SchedulerError> {
        let id = task.id;
        let due_at_ms = task.due_at_ms;
        self.pending.lock().push(task);
        tracing::debug!(task_id = %id, due_at_ms, "task scheduled");
        Ok(id)
    }

    /// Schedule `action` to fire at an absolute wall-clock time.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::InvalidSchedule`] if `due_at` cannot be resolved to
    /// a point in time; the pending set is left unchanged.
    pub fn schedule_at(
        &self,
        action: impl Invalidate,
        due_at: SystemTime,
    ) -> Result<TaskId, SchedulerError> {
        self.schedule(ScheduledTask::new(action, due_at)?)
    }

    /// Schedule `action` to fire `delay_seconds` from now.
    ///
    /// Fractional delays are honored; zero and negative delays produce a
    /// task due on the very next drain.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::InvalidSchedule`] if the delay is not a finite
    /// number; the pending set is left unchanged.
    pub fn schedule_after(
        &self,
        action: impl Invalidate,
        delay_seconds: f64,
    ) -> Result<TaskId, SchedulerError> {
        self.schedule(ScheduledTask::after(action, delay_seconds)?)
    }

    /// Remove a pending task without executing it.
    ///
    /// Returns `true` if the task was still pending. A task that already
    /// fired (or was never scheduled here) yields `false`. Letting a
    /// superseded task fire is harmless (it only marks data stale), so
    /// cancellation is an optimization, not a correctness requirement.
    pub fn cancel(&self, id: TaskId) -> bool {
        let mut pending = self.pending.lock();
        let before = pending.len();
        pending.retain(|t| t.id != id);
        let removed = pending.len() < before;
        drop(pending);
        if removed {
            tracing::debug!(task_id = %id, "task cancelled");
        }
        removed
    }

    /// Run every task whose due time is at or before `now_ms`.
    ///
    /// The pending set is partitioned against the single `now_ms` snapshot:
    /// due tasks are removed from the set first, then their actions run, so
    /// a slow or re-entrant action can never observe (or re-fire) a task the
    /// drain already claimed. Invocation order across due tasks is
    /// unspecified.
    ///
    /// A failing or panicking action is logged and isolated; remaining due
    /// tasks in the same drain still run, and the caller's cadence is never
    /// torn down by a bad action. Returns the number of actions invoked.
    pub fn drain(&self, now_ms: u128) -> usize {
        let due: Vec<ScheduledTask> = {
            let mut pending = self.pending.lock();
            let (due, retained): (Vec<_>, Vec<_>) = std::mem::take(&mut *pending)
                .into_iter()
                .partition(|t| t.is_due(now_ms));
            if !due.is_empty() {
                tracing::debug!(due = due.len(), retained = retained.len(), now_ms, "draining due tasks");
            }
            *pending = retained;
            due
        };

        let fired = due.len();
        for task in due {
            let id = task.id;
            match catch_unwind(AssertUnwindSafe(|| task.action.invalidate())) {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    tracing::warn!(task_id = %id, error = %format!("{err:#}"), "scheduled action failed");
                }
                Err(payload) => {
                    tracing::warn!(task_id = %id, panic = %panic_message(&payload), "scheduled action panicked");
                }
            }
        }
        fired
    }

    /// Number of tasks currently pending.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    /// Whether the pending set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".into())
}
