//! Core scheduling abstractions: tasks, the pending queue, and errors.

pub mod error;
pub mod queue;
pub mod task;

pub use error::{AppResult, SchedulerError};
pub use queue::TaskQueue;
pub use task::{Invalidate, ScheduledTask, TaskId};
