//! Expiring Cache Module
//!
//! Thread-safe handle over `CacheStore` that owns the background reclamation
//! task for its whole lifetime.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use bytes::Bytes;
use tokio::runtime::Handle;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use crate::cache::stats::StatsRecorder;
use crate::cache::{CacheStats, CacheStore};
use crate::config::{CacheConfig, ExpiryPolicy};
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_reaper, ReaperHandle};

// == Shared State ==
/// State shared between cache handles and the reclamation task.
#[derive(Debug)]
pub(crate) struct Shared<V> {
    pub(crate) store: RwLock<CacheStore<V>>,
    pub(crate) stats: StatsRecorder,
}

impl<V> Shared<V> {
    pub(crate) fn new(store: CacheStore<V>) -> Self {
        Self {
            store: RwLock::new(store),
            stats: StatsRecorder::default(),
        }
    }

    /// Runs one sweep under the write lock and records it.
    pub(crate) async fn sweep(&self) -> usize {
        let removed = {
            let mut store = self.store.write().await;
            store.sweep(Instant::now())
        };
        self.stats.record_sweep(removed);
        removed
    }
}

// == Expiring Cache ==
/// In-memory cache whose entries are reclaimed once they reach a fixed age.
///
/// Construction spawns exactly one reclamation task on the current tokio
/// runtime. Every `interval` the task removes entries whose age has reached
/// `interval`, so an entry stays visible for at most two intervals after its
/// last `put`. Use `ExpiryPolicy::Lazy` to hide stale entries from reads
/// before the sweep catches them.
///
/// The task stops when `shutdown` is awaited or the cache is dropped. Share
/// a cache across tasks by wrapping it in an `Arc`.
pub struct ExpiringCache<V = Bytes> {
    shared: Arc<Shared<V>>,
    reaper: Mutex<Option<ReaperHandle>>,
    interval: Duration,
    policy: ExpiryPolicy,
}

impl ExpiringCache {
    // == Constructor ==
    /// Creates a byte-payload cache with the default expiry policy.
    ///
    /// Fails with `CacheError::InvalidInterval` for a zero or unschedulable
    /// interval, with `CacheError::NoRuntime` when called outside a tokio
    /// runtime, and with `CacheError::TimerUnavailable` when that runtime has
    /// no timer driver.
    pub fn new(interval: Duration) -> Result<Self> {
        Self::from_config(&CacheConfig::new(interval))
    }
}

impl<V> ExpiringCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Creates a cache from a full configuration.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        config.validate()?;
        let runtime = Handle::try_current().map_err(|_| CacheError::NoRuntime)?;

        let shared = Arc::new(Shared::new(CacheStore::new(
            config.interval,
            config.expiry_policy,
        )));
        let reaper = spawn_reaper(Arc::clone(&shared), config.interval, &runtime)?;

        Ok(Self {
            shared,
            reaper: Mutex::new(Some(reaper)),
            interval: config.interval,
            policy: config.expiry_policy,
        })
    }

    // == Put ==
    /// Inserts or replaces the value for `key`.
    ///
    /// The timestamp is taken after the write lock is acquired, so the most
    /// recent `put` for a key always carries the newest timestamp.
    pub async fn put(&self, key: impl Into<String>, value: impl Into<V>) {
        let key = key.into();
        let value = value.into();
        let mut store = self.shared.store.write().await;
        store.insert(key, value, Instant::now());
    }

    // == Get ==
    /// Returns the value cached under `key`, or `None` on a miss.
    pub async fn get(&self, key: &str) -> Option<V> {
        let value = {
            let store = self.shared.store.read().await;
            store.get(key, Instant::now()).cloned()
        };

        if value.is_some() {
            self.shared.stats.record_hit();
            debug!("Cache hit for key {:?}", key);
        } else {
            self.shared.stats.record_miss();
            debug!("Cache miss for key {:?}", key);
        }
        value
    }

    // == Get Or Fetch ==
    /// Returns the cached value for `key`, calling `fetch` on a miss.
    ///
    /// A successful fetch is stored before being returned; a failed one
    /// leaves the cache untouched. No lock is held while `fetch` runs, so
    /// concurrent misses on the same key may each fetch.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: &str, fetch: F) -> std::result::Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<V, E>>,
    {
        if let Some(value) = self.get(key).await {
            return Ok(value);
        }

        let value = fetch().await?;
        self.put(key, value.clone()).await;
        Ok(value)
    }

    // == Remove ==
    /// Removes `key`, returning its value if it was present.
    pub async fn remove(&self, key: &str) -> Option<V> {
        self.shared.store.write().await.remove(key)
    }

    // == Purge Expired ==
    /// Runs one sweep immediately, returning the number of entries removed.
    pub async fn purge_expired(&self) -> usize {
        self.shared.sweep().await
    }

    // == Length ==
    /// Returns the current number of entries, including stale unswept ones.
    pub async fn len(&self) -> usize {
        self.shared.store.read().await.len()
    }

    /// Returns true if the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.shared.store.read().await.is_empty()
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub async fn stats(&self) -> CacheStats {
        let total_entries = self.len().await;
        self.shared.stats.snapshot(total_entries)
    }

    /// Sweep period and maximum entry age.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Read-time freshness policy.
    pub fn policy(&self) -> ExpiryPolicy {
        self.policy
    }

    // == Lifecycle ==
    /// Returns true while the reclamation task is alive.
    pub fn is_running(&self) -> bool {
        self.reaper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|reaper| !reaper.is_finished())
    }

    /// Stops the reclamation task and waits for it to exit.
    ///
    /// A sweep in progress runs to completion first. Calling this more than
    /// once is harmless. Entries stay readable afterwards but no longer expire
    /// unless `purge_expired` is called.
    pub async fn shutdown(&self) {
        let reaper = self
            .reaper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(reaper) = reaper {
            reaper.stop().await;
        }
    }
}

impl<V> fmt::Debug for ExpiringCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpiringCache")
            .field("interval", &self.interval)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
