//! # Refresh Scheduler
//!
//! A deferred cache-invalidation scheduler for clients of tick-based game
//! economies.
//!
//! This library provides the reconciliation layer between a locally cached
//! view of remote game state and server-side events whose completion time is
//! known in advance but which the server never pushes. When a command
//! completes, the server reports an absolute timestamp (a ship's arrival
//! time, a mining cooldown's expiry); the client schedules a deferred task so
//! that the dependent cached state is marked stale once that timestamp
//! passes.
//!
//! ## Core Problem Solved
//!
//! Tick-based game servers differ from typical request/response services:
//!
//! - **No push channel**: the server never notifies the client that a transit
//!   finished or a cooldown expired; the client must know when to re-fetch
//! - **Known completion times**: every long-running action reports its exact
//!   completion timestamp up front, so per-task timers are unnecessary
//! - **Stale reads are cheap, missed refreshes are not**: firing an
//!   invalidation late (or redundantly) only marks data stale; never firing
//!   it leaves the cached view permanently wrong
//!
//! ## Key Features
//!
//! - **TaskQueue**: an unordered multiset of pending tasks, each carrying an
//!   absolute due time and a single-shot [`core::Invalidate`] action
//! - **At-most-once execution**: a due task is removed from the pending set
//!   before its action runs, so re-entrant or slow actions cannot double-fire
//! - **PollDriver**: a fixed-cadence polling loop (default 500 ms) that
//!   drains the queue, with an explicit, idempotent stop path
//! - **Cancellation**: every task gets a stable id at schedule time and can
//!   be removed before it fires
//! - **Stale-key registry**: an in-memory implementation of the cache
//!   collaborator, so invalidation actions are testable end to end
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use refresh_scheduler::core::TaskQueue;
//! use refresh_scheduler::infra::{Invalidator, QueryKey, StaleMap};
//! use refresh_scheduler::runtime::{PollDriver, TokioSpawner};
//!
//! let queue = Arc::new(TaskQueue::new());
//! let stale = Arc::new(StaleMap::new());
//!
//! // A transit completes in 42.5 seconds; refresh the ship's nav view then.
//! let key = QueryKey::new(["get-ship-nav", "AGENT-1-SHIP-1"]);
//! queue.schedule_after(Invalidator::new(Arc::clone(&stale), key), 42.5)?;
//!
//! // Start the polling loop; stop it (or drop the handle) on teardown.
//! let driver = PollDriver::new(Arc::clone(&queue), Duration::from_millis(500));
//! let handle = driver.start(&TokioSpawner::new(tokio::runtime::Handle::current()));
//! // ...
//! handle.stop();
//! ```
//!
//! For complete examples, see:
//! - `tests/scheduler_test.rs` - Full integration tests

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]

/// Core scheduling abstractions: tasks, the pending queue, and errors.
pub mod core;
/// Configuration models for the scheduler and polling cadence.
pub mod config;
/// Builders to construct scheduler components from configuration.
pub mod builders;
/// Infrastructure adapters: the in-memory stale-key registry.
pub mod infra;
/// Runtime adapters: the polling driver and task spawners.
pub mod runtime;
/// Shared utilities.
pub mod util;
