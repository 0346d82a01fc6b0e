//! In-memory stale-key registry and the invalidation action built on it.
//!
//! Cached views are addressed by a [`QueryKey`]: an ordered list of string
//! segments naming a fetched resource, e.g. `["get-contracts"]` or
//! `["get-ship-nav", "AGENT-1-SHIP-1"]`. Marking a key stale tells the read
//! path that its next access must re-fetch; the registry never performs the
//! fetch itself.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::core::{AppResult, Invalidate};

/// Ordered segments naming a cached resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    /// Build a key from its segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// The key's segments in order.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

/// Shared registry of cached resources currently marked stale.
///
/// The typical flow: a scheduled task marks a key stale when a server-side
/// event completes; the read path checks [`StaleMap::is_stale`] before
/// serving a cached value and calls [`StaleMap::refresh`] once it has
/// re-fetched. Marking an already-stale key again is a no-op, so late or
/// duplicate invalidations are harmless.
#[derive(Default)]
pub struct StaleMap {
    stale: RwLock<HashSet<QueryKey>>,
}

impl StaleMap {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a cached resource stale.
    pub fn mark_stale(&self, key: &QueryKey) {
        let inserted = self.stale.write().insert(key.clone());
        if inserted {
            tracing::debug!(key = %key, "marked stale");
        }
    }

    /// Whether a cached resource is currently stale.
    #[must_use]
    pub fn is_stale(&self, key: &QueryKey) -> bool {
        self.stale.read().contains(key)
    }

    /// Clear a key after a successful re-fetch. Returns whether it was stale.
    pub fn refresh(&self, key: &QueryKey) -> bool {
        self.stale.write().remove(key)
    }

    /// Snapshot of all currently stale keys, in unspecified order.
    #[must_use]
    pub fn stale_keys(&self) -> Vec<QueryKey> {
        self.stale.read().iter().cloned().collect()
    }
}

/// Single-shot action that marks one key stale in a shared [`StaleMap`].
///
/// This is the standard payload of a scheduled task: it captures nothing but
/// the registry handle and the key, making the invalidation contract explicit
/// and testable.
pub struct Invalidator {
    map: Arc<StaleMap>,
    key: QueryKey,
}

impl Invalidator {
    /// Build an invalidator for `key` against `map`.
    #[must_use]
    pub fn new(map: Arc<StaleMap>, key: QueryKey) -> Self {
        Self { map, key }
    }
}

impl Invalidate for Invalidator {
    fn invalidate(self: Box<Self>) -> AppResult<()> {
        self.map.mark_stale(&self.key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_and_refresh() {
        let map = StaleMap::new();
        let key = QueryKey::new(["get-contracts"]);

        assert!(!map.is_stale(&key));
        map.mark_stale(&key);
        assert!(map.is_stale(&key));

        assert!(map.refresh(&key));
        assert!(!map.is_stale(&key));
        assert!(!map.refresh(&key));
    }

    #[test]
    fn test_duplicate_marks_are_noops() {
        let map = StaleMap::new();
        let key = QueryKey::new(["get-my-ships"]);
        map.mark_stale(&key);
        map.mark_stale(&key);
        assert_eq!(map.stale_keys().len(), 1);
    }

    #[test]
    fn test_invalidator_marks_only_its_key() {
        let map = Arc::new(StaleMap::new());
        let nav = QueryKey::new(["get-ship-nav", "SHIP-1"]);
        let cargo = QueryKey::new(["get-ship-cargo", "SHIP-1"]);

        let action = Box::new(Invalidator::new(Arc::clone(&map), nav.clone()));
        action.invalidate().unwrap();

        assert!(map.is_stale(&nav));
        assert!(!map.is_stale(&cargo));
    }

    #[test]
    fn test_key_display() {
        let key = QueryKey::new(["get-ship-nav", "SHIP-1"]);
        assert_eq!(key.to_string(), "get-ship-nav/SHIP-1");
        assert_eq!(key.segments().len(), 2);
    }
}
