//! Error types for scheduler operations.

use thiserror::Error;

/// Errors produced by scheduler components.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Supplied due time cannot be resolved to a valid point in time.
    #[error("invalid schedule time: {0}")]
    InvalidSchedule(String),
    /// Configuration validation or parse failure.
    #[error("config error: {0}")]
    Config(String),
}

/// Application-facing result using anyhow for higher-level contexts.
///
/// Invalidation actions return this so a failing cache handle surfaces with
/// full context in the drain log without aborting the drain.
pub type AppResult<T> = Result<T, anyhow::Error>;
