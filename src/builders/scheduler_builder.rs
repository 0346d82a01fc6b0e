//! Builders to construct the scheduler from configuration.

use std::sync::Arc;

use crate::config::SchedulerConfig;
use crate::core::{SchedulerError, TaskQueue};
#[cfg(feature = "tokio-runtime")]
use crate::runtime::PollDriver;

/// Build a task queue and its polling driver from validated configuration.
///
/// The driver is returned unstarted; the owning scope decides when to call
/// [`PollDriver::start`] and holds the resulting handle for teardown.
///
/// # Errors
///
/// [`SchedulerError::Config`] if the configuration fails validation.
#[cfg(feature = "tokio-runtime")]
pub fn build_scheduler(
    cfg: &SchedulerConfig,
) -> Result<(Arc<TaskQueue>, PollDriver), SchedulerError> {
    cfg.validate()?;
    let queue = Arc::new(TaskQueue::new());
    let driver = PollDriver::new(Arc::clone(&queue), cfg.poll_interval())
        .with_backlog_warning(cfg.max_pending_warn);
    Ok((queue, driver))
}

/// Build a standalone task queue from validated configuration.
///
/// For callers that drive draining themselves (tests, custom loops).
///
/// # Errors
///
/// [`SchedulerError::Config`] if the configuration fails validation.
pub fn build_queue(cfg: &SchedulerConfig) -> Result<Arc<TaskQueue>, SchedulerError> {
    cfg.validate()?;
    Ok(Arc::new(TaskQueue::new()))
}
