//! Configuration models for the scheduler and polling cadence.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::SchedulerError;

/// Reference polling cadence in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Pending-backlog size above which the driver logs a warning.
pub const DEFAULT_MAX_PENDING_WARN: usize = 1_024;

/// Scheduler configuration.
///
/// The cadence is a static value, never derived from the soonest pending due
/// time: polling bounds the worst-case latency between a task becoming due
/// and its action firing to one interval, and keeps the driver trivially
/// predictable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Fixed polling cadence in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Pending-task count above which a drain logs a backlog warning.
    /// Stale tasks are harmless individually but unbounded accumulation in
    /// long sessions is a resource concern worth surfacing.
    #[serde(default = "default_max_pending_warn")]
    pub max_pending_warn: usize,
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_max_pending_warn() -> usize {
    DEFAULT_MAX_PENDING_WARN
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            max_pending_warn: DEFAULT_MAX_PENDING_WARN,
        }
    }
}

impl SchedulerConfig {
    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::Config`] naming the offending field.
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if self.poll_interval_ms == 0 {
            return Err(SchedulerError::Config(
                "poll_interval_ms must be greater than 0".into(),
            ));
        }
        if self.max_pending_warn == 0 {
            return Err(SchedulerError::Config(
                "max_pending_warn must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Parse scheduler configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::Config`] on parse or validation failure.
    pub fn from_json_str(input: &str) -> Result<Self, SchedulerError> {
        let cfg: Self = serde_json::from_str(input)
            .map_err(|e| SchedulerError::Config(format!("parse error: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// The polling cadence as a [`Duration`].
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
