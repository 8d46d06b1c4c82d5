//! # ttlcache core
//!
//! A thread-safe in-memory string cache where every entry carries its own
//! expiration time.
//!
//! ## Features
//!
//! - One table behind a single reader/writer lock
//! - Lazy expiration: a read that finds an expired entry removes it
//! - Optional background sweep on a fixed interval, started and stopped explicitly
//! - Restartable: `start_background_sweep` / `shutdown` can be cycled on one instance
//!
//! `keys()` and `len()` report the raw table, so entries that have expired
//! but were neither read nor swept yet are still counted.
//!
//! ## Example
//!
//! ```rust,no_run
//! use ttlcache_core::{CacheConfig, TtlCache};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ttlcache_core::CacheError> {
//!     let config = CacheConfig::default()
//!         .with_sweep_interval(Duration::from_millis(100));
//!     let cache = TtlCache::with_config(config);
//!     cache.start_background_sweep()?;
//!
//!     // Store a value for 200ms
//!     cache.set("name", "Vadim", Duration::from_millis(200));
//!
//!     if let Some(value) = cache.get("name") {
//!         println!("immediate: {}", value);
//!     }
//!
//!     tokio::time::sleep(Duration::from_millis(300)).await;
//!     assert!(!cache.exists("name"));
//!
//!     // Stops the sweeper; entries stay readable
//!     cache.shutdown().await;
//!     Ok(())
//! }
//! ```

mod cache;
mod config;
mod entry;
mod error;

pub use cache::TtlCache;
pub use config::{CacheConfig, SWEEP_INTERVAL_ENV};
pub use entry::Entry;
pub use error::CacheError;
