//! Epoch-millisecond clock helpers.
//!
//! All scheduling decisions compare `u128` epoch milliseconds. Conversions
//! from wall-clock types happen once, at schedule time, so an unresolvable
//! time is rejected before a task ever enters the pending set.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::core::SchedulerError;

/// Current wall-clock time in milliseconds since the Unix epoch.
#[must_use]
pub fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

/// Resolve an absolute [`SystemTime`] to epoch milliseconds.
///
/// Times before the Unix epoch are unrepresentable as a due time and are
/// rejected with [`SchedulerError::InvalidSchedule`].
pub fn to_epoch_ms(time: SystemTime) -> Result<u128, SchedulerError> {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .map_err(|_| SchedulerError::InvalidSchedule("due time precedes the Unix epoch".into()))
}

/// Compute an absolute due time `delay_seconds` from now, in epoch ms.
///
/// Fractional delays are honored to millisecond precision. Zero and negative
/// delays are legal and resolve to a time already past (the task fires on the
/// next drain). Non-finite delays cannot be resolved and are rejected.
pub fn after_seconds(delay_seconds: f64) -> Result<u128, SchedulerError> {
    if !delay_seconds.is_finite() {
        return Err(SchedulerError::InvalidSchedule(format!(
            "delay of {delay_seconds} seconds is not a resolvable time"
        )));
    }
    let now = now_ms();
    let delta_ms = (delay_seconds * 1000.0) as i128;
    if delta_ms.is_negative() {
        Ok(now.saturating_sub(delta_ms.unsigned_abs()))
    } else {
        Ok(now.saturating_add(delta_ms.unsigned_abs()))
    }
}
