//! Cache Store Module
//!
//! The unsynchronized entry map behind `ExpiringCache`. Every time-dependent
//! method takes `now` explicitly so the caller decides when the clock is read.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

use crate::cache::CacheEntry;
use crate::config::ExpiryPolicy;

// == Cache Store ==
/// Key-value storage with per-entry insertion timestamps.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Age at which an entry is eligible for removal
    max_age: Duration,
    /// Read-time freshness policy
    policy: ExpiryPolicy,
}

impl<V> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store whose entries expire once they reach `max_age`.
    pub fn new(max_age: Duration, policy: ExpiryPolicy) -> Self {
        Self {
            entries: HashMap::new(),
            max_age,
            policy,
        }
    }

    // == Insert ==
    /// Stores `value` under `key`, stamped with `now`.
    ///
    /// An existing entry is replaced and its age restarts from `now`.
    pub fn insert(&mut self, key: String, value: V, now: Instant) {
        self.entries.insert(key, CacheEntry::new(value, now));
    }

    // == Get ==
    /// Looks up `key` as seen at `now`.
    ///
    /// Under `ExpiryPolicy::Sweep` any present entry is returned regardless
    /// of age. Under `ExpiryPolicy::Lazy` an entry that has reached `max_age`
    /// reads as absent; it stays in the map until the next sweep.
    pub fn get(&self, key: &str, now: Instant) -> Option<&V> {
        let entry = self.entries.get(key)?;
        match self.policy {
            ExpiryPolicy::Lazy if entry.is_expired(now, self.max_age) => None,
            _ => Some(&entry.value),
        }
    }

    // == Remove ==
    /// Removes `key`, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.entries.remove(key).map(|entry| entry.value)
    }

    // == Sweep ==
    /// Removes every entry whose age at `now` has reached `max_age`.
    ///
    /// Returns the number of entries removed.
    pub fn sweep(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        let max_age = self.max_age;
        self.entries.retain(|_, entry| !entry.is_expired(now, max_age));
        before - self.entries.len()
    }

    // == Accessors ==
    /// Returns the current number of entries, including stale unswept ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Age at which entries become eligible for removal.
    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Read-time freshness policy.
    pub fn policy(&self) -> ExpiryPolicy {
        self.policy
    }
}
