//! Builders to construct scheduler components from configuration.

pub mod scheduler_builder;

#[cfg(feature = "tokio-runtime")]
pub use scheduler_builder::build_scheduler;
pub use scheduler_builder::build_queue;
