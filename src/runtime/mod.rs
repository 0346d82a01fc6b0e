//! Runtime adapters: the polling driver and task spawners.

use std::future::Future;

#[cfg(feature = "tokio-runtime")]
pub mod poll_driver;
#[cfg(feature = "tokio-runtime")]
pub mod tokio_spawner;

#[cfg(feature = "tokio-runtime")]
pub use poll_driver::{DriverHandle, PollDriver};
#[cfg(feature = "tokio-runtime")]
pub use tokio_spawner::TokioSpawner;

/// Abstraction for spawning the polling loop on a runtime.
pub trait Spawn {
    /// Spawn an async task that returns a future.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}
