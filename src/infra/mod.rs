//! Infrastructure adapters: the in-memory stale-key registry.

pub mod stale;

pub use stale::{Invalidator, QueryKey, StaleMap};
