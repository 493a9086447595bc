//! Cache Module
//!
//! Provides an in-memory cache with periodic time-based reclamation.

mod entry;
mod expiring;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use expiring::ExpiringCache;
pub use stats::CacheStats;
pub use store::CacheStore;

pub(crate) use expiring::Shared;
