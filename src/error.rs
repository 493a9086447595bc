//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use std::time::Duration;

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
///
/// Only construction and configuration can fail. Lookups report a miss as
/// `None`, never as an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Reclamation interval must be non-zero and schedulable
    #[error("Invalid interval: {0:?} (must be greater than zero and at most one year)")]
    InvalidInterval(Duration),

    /// The reclamation task needs a tokio runtime to run on
    #[error("No tokio runtime available to spawn the reclamation task")]
    NoRuntime,

    /// The tokio runtime was built without its timer driver
    #[error("Tokio runtime has timers disabled; build it with `enable_time`")]
    TimerUnavailable,

    /// An environment variable held a value that could not be parsed
    #[error("Invalid configuration: {var}={value:?}")]
    InvalidConfig { var: &'static str, value: String },
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
