//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;

use crate::error::{CacheError, Result};

/// Environment variable holding the reclamation interval in seconds
pub const INTERVAL_ENV: &str = "CACHE_INTERVAL_SECS";

/// Environment variable selecting the expiry policy (`sweep` or `lazy`)
pub const POLICY_ENV: &str = "CACHE_EXPIRY_POLICY";

const DEFAULT_INTERVAL_SECS: u64 = 5;

/// Longest accepted reclamation interval
pub const MAX_INTERVAL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

// == Expiry Policy ==
/// How freshness is enforced on reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpiryPolicy {
    /// Entries are only removed by the periodic sweep. A read may observe an
    /// entry older than the interval until the next sweep runs.
    #[default]
    Sweep,
    /// Same sweep, plus reads treat an entry that has reached the interval
    /// as a miss.
    Lazy,
}

impl FromStr for ExpiryPolicy {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sweep" => Ok(Self::Sweep),
            "lazy" => Ok(Self::Lazy),
            _ => Err(CacheError::InvalidConfig {
                var: POLICY_ENV,
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ExpiryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sweep => f.write_str("sweep"),
            Self::Lazy => f.write_str("lazy"),
        }
    }
}

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Sweep period, and the age at which an entry becomes eligible for removal
    pub interval: Duration,
    /// Read-time freshness policy
    pub expiry_policy: ExpiryPolicy,
}

impl CacheConfig {
    /// Creates a config with the given interval and the default policy.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            expiry_policy: ExpiryPolicy::default(),
        }
    }

    /// Sets the expiry policy
    pub fn with_expiry_policy(mut self, policy: ExpiryPolicy) -> Self {
        self.expiry_policy = policy;
        self
    }

    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_INTERVAL_SECS` - Reclamation interval in seconds (default: 5)
    /// - `CACHE_EXPIRY_POLICY` - `sweep` or `lazy` (default: sweep)
    ///
    /// Unset variables fall back to defaults; set but unparseable ones are
    /// rejected. Zero or oversized intervals are only rejected by `validate`
    /// when the cache is built.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let interval = match lookup(INTERVAL_ENV) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| CacheError::InvalidConfig {
                    var: INTERVAL_ENV,
                    value: raw,
                })?,
            None => Duration::from_secs(DEFAULT_INTERVAL_SECS),
        };

        let expiry_policy = match lookup(POLICY_ENV) {
            Some(raw) => raw.parse()?,
            None => ExpiryPolicy::default(),
        };

        Ok(Self {
            interval,
            expiry_policy,
        })
    }

    /// Fails when the interval would make the sweep loop spin, or is too
    /// large for the timer to schedule.
    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() || self.interval > MAX_INTERVAL {
            return Err(CacheError::InvalidInterval(self.interval));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_INTERVAL_SECS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&'static str, &str)]) -> impl Fn(&'static str) -> Option<String> {
        let vars: HashMap<&'static str, String> =
            pairs.iter().map(|(k, v)| (*k, v.to_string())).collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn test_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.interval, Duration::from_secs(5));
        assert_eq!(config.expiry_policy, ExpiryPolicy::Sweep);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_lookup_defaults() {
        let config = CacheConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, CacheConfig::default());
    }

    #[test]
    fn test_config_from_lookup_values() {
        let config = CacheConfig::from_lookup(lookup_from(&[
            (INTERVAL_ENV, "100"),
            (POLICY_ENV, " Lazy "),
        ]))
        .unwrap();

        assert_eq!(config.interval, Duration::from_secs(100));
        assert_eq!(config.expiry_policy, ExpiryPolicy::Lazy);
    }

    #[test]
    fn test_config_rejects_garbage_interval() {
        let err = CacheConfig::from_lookup(lookup_from(&[(INTERVAL_ENV, "ten")])).unwrap_err();
        assert_eq!(
            err,
            CacheError::InvalidConfig {
                var: INTERVAL_ENV,
                value: "ten".to_string()
            }
        );
    }

    #[test]
    fn test_config_rejects_unknown_policy() {
        let err = CacheConfig::from_lookup(lookup_from(&[(POLICY_ENV, "lru")])).unwrap_err();
        assert!(matches!(err, CacheError::InvalidConfig { var: POLICY_ENV, .. }));
    }

    #[test]
    fn test_zero_interval_fails_validation() {
        let config = CacheConfig::from_lookup(lookup_from(&[(INTERVAL_ENV, "0")])).unwrap();
        assert_eq!(
            config.validate(),
            Err(CacheError::InvalidInterval(Duration::ZERO))
        );
    }

    #[test]
    fn test_unschedulable_interval_fails_validation() {
        let config = CacheConfig::from_lookup(lookup_from(&[(
            INTERVAL_ENV,
            "18446744073709551615",
        )]))
        .unwrap();

        assert_eq!(
            config.validate(),
            Err(CacheError::InvalidInterval(Duration::from_secs(u64::MAX)))
        );
        assert!(CacheConfig::new(MAX_INTERVAL).validate().is_ok());
    }

    #[test]
    fn test_policy_display_roundtrips() {
        for policy in [ExpiryPolicy::Sweep, ExpiryPolicy::Lazy] {
            assert_eq!(policy.to_string().parse::<ExpiryPolicy>().unwrap(), policy);
        }
    }
}
