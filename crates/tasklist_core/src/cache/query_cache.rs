//! Keyed query-result cache with explicit invalidation.
//!
//! # Responsibility
//! - Hold the latest result of each keyed read query.
//! - Let writers discard a cached result so the next read re-fetches.
//!
//! # Invariants
//! - Each key carries a generation that only grows. Starting a fetch or
//!   invalidating bumps it; a fetch may only resolve against the generation
//!   it started at, so a superseded fetch can never overwrite newer state.
//! - A `Loading` entry never exposes a previous value.

use std::collections::HashMap;
use std::hash::Hash;

/// Lifecycle of one cached query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryState<V> {
    Loading,
    Ready(V),
    Failed(String),
}

/// Cache key for task queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskQueryKey {
    /// The full task list.
    All,
}

/// Proof that a fetch was started for `key` at `generation`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a fetch ticket must be resolved for the result to be cached"]
pub struct FetchTicket<K> {
    key: K,
    generation: u64,
}

impl<K> FetchTicket<K> {
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug)]
struct Entry<V> {
    generation: u64,
    state: Option<QueryState<V>>,
}

impl<V> Default for Entry<V> {
    fn default() -> Self {
        Self {
            generation: 0,
            state: None,
        }
    }
}

/// Query cache keyed by `K`.
#[derive(Debug)]
pub struct QueryCache<K, V> {
    entries: HashMap<K, Entry<V>>,
}

impl<K, V> Default for QueryCache<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone, V> QueryCache<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state for `key`, `None` when never fetched or
    /// invalidated since.
    pub fn get(&self, key: &K) -> Option<&QueryState<V>> {
        self.entries.get(key).and_then(|entry| entry.state.as_ref())
    }

    /// Returns the cached value when the last fetch succeeded.
    pub fn fresh_value(&self, key: &K) -> Option<&V> {
        match self.get(key) {
            Some(QueryState::Ready(value)) => Some(value),
            _ => None,
        }
    }

    /// Whether a read of `key` must start a new fetch.
    ///
    /// Failed results are terminal: they are not stale until invalidated.
    pub fn is_stale(&self, key: &K) -> bool {
        self.get(key).is_none()
    }

    /// Marks `key` as loading and returns the ticket its result must carry.
    pub fn begin_fetch(&mut self, key: K) -> FetchTicket<K> {
        let entry = self.entries.entry(key.clone()).or_default();
        entry.generation += 1;
        entry.state = Some(QueryState::Loading);
        FetchTicket {
            key,
            generation: entry.generation,
        }
    }

    /// Stores the outcome of a fetch.
    ///
    /// Returns `false` and drops the outcome when the ticket was superseded
    /// by a later fetch or an invalidation.
    pub fn resolve(&mut self, ticket: FetchTicket<K>, outcome: Result<V, String>) -> bool {
        let Some(entry) = self.entries.get_mut(&ticket.key) else {
            return false;
        };
        if entry.generation != ticket.generation {
            return false;
        }
        entry.state = Some(match outcome {
            Ok(value) => QueryState::Ready(value),
            Err(message) => QueryState::Failed(message),
        });
        true
    }

    /// Discards the cached result for `key` so the next read re-fetches.
    pub fn invalidate(&mut self, key: &K) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.generation += 1;
            entry.state = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{QueryCache, QueryState, TaskQueryKey};

    #[test]
    fn fetch_resolves_into_ready_state() {
        let mut cache = QueryCache::<TaskQueryKey, Vec<u32>>::new();
        assert!(cache.is_stale(&TaskQueryKey::All));

        let ticket = cache.begin_fetch(TaskQueryKey::All);
        assert_eq!(cache.get(&TaskQueryKey::All), Some(&QueryState::Loading));
        assert!(!cache.is_stale(&TaskQueryKey::All));

        assert!(cache.resolve(ticket, Ok(vec![1, 2])));
        assert_eq!(cache.fresh_value(&TaskQueryKey::All), Some(&vec![1, 2]));
    }

    #[test]
    fn invalidate_discards_value_and_marks_stale() {
        let mut cache = QueryCache::<TaskQueryKey, Vec<u32>>::new();
        let ticket = cache.begin_fetch(TaskQueryKey::All);
        cache.resolve(ticket, Ok(vec![1]));

        cache.invalidate(&TaskQueryKey::All);
        assert!(cache.is_stale(&TaskQueryKey::All));
        assert_eq!(cache.fresh_value(&TaskQueryKey::All), None);
    }

    #[test]
    fn superseded_fetch_cannot_overwrite_newer_result() {
        let mut cache = QueryCache::<TaskQueryKey, Vec<u32>>::new();
        let slow = cache.begin_fetch(TaskQueryKey::All);
        let fast = cache.begin_fetch(TaskQueryKey::All);

        assert!(cache.resolve(fast, Ok(vec![1, 2, 3])));
        assert!(!cache.resolve(slow, Ok(vec![1])));
        assert_eq!(cache.fresh_value(&TaskQueryKey::All), Some(&vec![1, 2, 3]));
    }

    #[test]
    fn fetch_started_before_invalidation_is_dropped() {
        let mut cache = QueryCache::<TaskQueryKey, Vec<u32>>::new();
        let ticket = cache.begin_fetch(TaskQueryKey::All);
        cache.invalidate(&TaskQueryKey::All);

        assert!(!cache.resolve(ticket, Ok(vec![9])));
        assert!(cache.is_stale(&TaskQueryKey::All));
    }

    #[test]
    fn failure_is_terminal_until_invalidated() {
        let mut cache = QueryCache::<TaskQueryKey, Vec<u32>>::new();
        let ticket = cache.begin_fetch(TaskQueryKey::All);
        cache.resolve(ticket, Err("boom".to_string()));

        assert_eq!(
            cache.get(&TaskQueryKey::All),
            Some(&QueryState::Failed("boom".to_string()))
        );
        assert!(!cache.is_stale(&TaskQueryKey::All));

        cache.invalidate(&TaskQueryKey::All);
        assert!(cache.is_stale(&TaskQueryKey::All));
    }
}
