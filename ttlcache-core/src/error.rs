//! Error types for the cache.

use thiserror::Error;

/// Errors reported by [`TtlCache`](crate::TtlCache) and [`CacheConfig`](crate::CacheConfig).
///
/// Cache lookups never fail; a missing or expired key is `None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The background sweep was started outside of a Tokio runtime
    #[error("background sweep requires a Tokio runtime; call it from within #[tokio::main], #[tokio::test] or a spawned task")]
    NoRuntime,

    /// An environment variable held a value that could not be parsed
    #[error("invalid value {value:?} for {var}")]
    InvalidConfig {
        /// Name of the offending variable
        var: &'static str,
        /// The raw value that failed to parse
        value: String,
    },
}

impl CacheError {
    /// Returns `true` if this error means no runtime was available.
    pub fn is_no_runtime(&self) -> bool {
        matches!(self, CacheError::NoRuntime)
    }
}
