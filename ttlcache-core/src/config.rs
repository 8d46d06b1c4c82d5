use std::time::Duration;

use crate::error::CacheError;

/// Environment variable holding the sweep interval in milliseconds
pub const SWEEP_INTERVAL_ENV: &str = "TTLCACHE_SWEEP_INTERVAL_MS";

const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Configuration for a [`TtlCache`](crate::TtlCache)
///
/// # Example
///
/// ```rust
/// use ttlcache_core::CacheConfig;
/// use std::time::Duration;
///
/// let config = CacheConfig::default()
///     .with_sweep_interval(Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Interval between background sweep passes (default: 60 seconds).
    /// Zero disables the background sweep.
    pub sweep_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

impl CacheConfig {
    /// Creates a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sweep interval
    ///
    /// This determines how often the background task removes expired entries
    /// once [`TtlCache::start_background_sweep`](crate::TtlCache::start_background_sweep)
    /// has been called. `Duration::ZERO` turns the sweep off.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Create a configuration from environment variables.
    ///
    /// Reads:
    /// - `TTLCACHE_SWEEP_INTERVAL_MS` - sweep interval in milliseconds (defaults to 60000, `0` disables)
    pub fn from_env() -> Result<Self, CacheError> {
        Self::from_env_or(Self::default())
    }

    /// Like [`from_env`](Self::from_env), but variables that are not set keep
    /// the values from `fallback` instead of the defaults.
    pub fn from_env_or(fallback: Self) -> Result<Self, CacheError> {
        Self::from_lookup(fallback, |name| std::env::var(name).ok())
    }

    fn from_lookup(
        fallback: Self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, CacheError> {
        let mut config = fallback;

        if let Some(raw) = lookup(SWEEP_INTERVAL_ENV) {
            let millis: u64 = raw.trim().parse().map_err(|_| CacheError::InvalidConfig {
                var: SWEEP_INTERVAL_ENV,
                value: raw.clone(),
            })?;
            config.sweep_interval = Duration::from_millis(millis);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.sweep_interval, Duration::from_secs(60));
    }

    #[test]
    fn test_builder_pattern_chaining() {
        let config = CacheConfig::new().with_sweep_interval(Duration::from_millis(250));
        assert_eq!(config.sweep_interval, Duration::from_millis(250));
    }

    #[test]
    fn test_lookup_missing_var_keeps_default() {
        let config = CacheConfig::from_lookup(CacheConfig::default(), |_| None).unwrap();
        assert_eq!(config, CacheConfig::default());
    }

    #[test]
    fn test_lookup_parses_millis() {
        let config = CacheConfig::from_lookup(CacheConfig::default(), |name| {
            assert_eq!(name, SWEEP_INTERVAL_ENV);
            Some(" 1500 ".to_string())
        })
        .unwrap();
        assert_eq!(config.sweep_interval, Duration::from_millis(1500));
    }

    #[test]
    fn test_lookup_zero_disables_sweep() {
        let config = CacheConfig::from_lookup(CacheConfig::default(), |_| Some("0".to_string())).unwrap();
        assert_eq!(config.sweep_interval, Duration::ZERO);
    }

    #[test]
    fn test_lookup_missing_var_keeps_fallback() {
        let fallback = CacheConfig::new().with_sweep_interval(Duration::from_millis(100));
        let config = CacheConfig::from_lookup(fallback.clone(), |_| None).unwrap();
        assert_eq!(config, fallback);
    }

    #[test]
    fn test_lookup_var_overrides_fallback() {
        let fallback = CacheConfig::new().with_sweep_interval(Duration::from_millis(100));
        let config = CacheConfig::from_lookup(fallback, |_| Some("2000".to_string())).unwrap();
        assert_eq!(config.sweep_interval, Duration::from_secs(2));
    }

    #[test]
    fn test_lookup_rejects_garbage() {
        let err = CacheConfig::from_lookup(CacheConfig::default(), |_| Some("soon".to_string())).unwrap_err();
        match err {
            CacheError::InvalidConfig { var, value } => {
                assert_eq!(var, SWEEP_INTERVAL_ENV);
                assert_eq!(value, "soon");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_lookup_rejects_negative() {
        assert!(CacheConfig::from_lookup(CacheConfig::default(), |_| Some("-5".to_string())).is_err());
    }
}
