//! Pokecache - A thread-safe in-memory cache with time-based reclamation
//!
//! Stores opaque payloads by key and removes them once they reach a fixed
//! age, using a background sweep tied to the cache's lifetime.

pub mod cache;
pub mod config;
pub mod error;
mod tasks;

pub use cache::{CacheStats, ExpiringCache};
pub use config::{CacheConfig, ExpiryPolicy};
pub use error::{CacheError, Result};
