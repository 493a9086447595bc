//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with their insertion time.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Insertion time on the monotonic clock
    pub created_at: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry stamped with `now`.
    pub fn new(value: V, now: Instant) -> Self {
        Self {
            value,
            created_at: now,
        }
    }

    // == Age ==
    /// Time elapsed since insertion, as seen at `now`.
    ///
    /// Saturates to zero if `now` predates the entry.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }

    // == Is Expired ==
    /// Checks if the entry has reached `max_age`.
    ///
    /// Boundary condition: an entry whose age equals `max_age` is expired, so
    /// a sweep running exactly one interval after insertion removes it.
    /// A strict `>` would keep an entry put at t=0 through the t=2 sweep of a
    /// 2s cache and still serve it at t=3.
    pub fn is_expired(&self, now: Instant, max_age: Duration) -> bool {
        self.age(now) >= max_age
    }
}
