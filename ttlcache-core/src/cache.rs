use parking_lot::{Mutex, RwLock, RwLockUpgradableReadGuard};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::MissedTickBehavior;

use crate::config::CacheConfig;
use crate::entry::Entry;
use crate::error::CacheError;

/// Internal shared state for the cache
struct CacheInner {
    table: RwLock<HashMap<String, Entry>>,
    sweep_interval: Duration,
    /// The running sweep task, if any. Never held across an await.
    sweeper: Mutex<Option<Sweeper>>,
}

/// Handle to one running background sweep task
///
/// The slot stays occupied until `shutdown` has joined the task; `handle` is
/// `None` once a shutdown has taken it.
struct Sweeper {
    stop_tx: watch::Sender<bool>,
    task: AbortHandle,
    handle: Option<JoinHandle<()>>,
}

impl Sweeper {
    fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    fn is_stopping(&self) -> bool {
        self.handle.is_none()
    }
}

impl CacheInner {
    /// Removes every entry that is expired as of the start of the pass
    fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let mut table = self.table.write();
        let before = table.len();
        table.retain(|_, entry| !entry.is_expired_at(now));
        before - table.len()
    }
}

/// Thread-safe in-memory string cache with a TTL on every entry
///
/// Expired entries are reclaimed two ways: lazily, by the read that finds
/// them, and optionally by a background sweep task that scans the whole
/// table once per configured interval.
///
/// Constructing a cache never spawns anything. The sweep task is started
/// explicitly with [`start_background_sweep`](Self::start_background_sweep)
/// and stopped with [`shutdown`](Self::shutdown); the pair can be repeated
/// on the same instance.
///
/// Cloning is cheap: clones share the same table and the same sweep task.
///
/// # Example
///
/// ```rust,no_run
/// use ttlcache_core::TtlCache;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), ttlcache_core::CacheError> {
///     let cache = TtlCache::new(Duration::from_millis(100));
///     cache.start_background_sweep()?;
///
///     cache.set("session", "abc", Duration::from_secs(5));
///     assert_eq!(cache.get("session").as_deref(), Some("abc"));
///
///     cache.shutdown().await;
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct TtlCache {
    inner: Arc<CacheInner>,
}

impl TtlCache {
    /// Creates an empty cache whose background sweep, once started, runs
    /// every `sweep_interval`. `Duration::ZERO` disables the sweep.
    pub fn new(sweep_interval: Duration) -> Self {
        Self::with_config(CacheConfig::default().with_sweep_interval(sweep_interval))
    }

    /// Creates an empty cache from a [`CacheConfig`]
    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                table: RwLock::new(HashMap::new()),
                sweep_interval: config.sweep_interval,
                sweeper: Mutex::new(None),
            }),
        }
    }

    /// Stores `value` under `key` for `ttl`
    ///
    /// Any previous entry for the key is replaced along with its deadline.
    /// A zero `ttl` means "do not cache": the key is removed instead.
    /// A `ttl` too large to add to the current instant yields an entry that
    /// never expires.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>, ttl: Duration) {
        let key = key.into();
        if ttl.is_zero() {
            self.delete(&key);
            return;
        }

        let entry = match Instant::now().checked_add(ttl) {
            Some(deadline) => Entry::new(value, deadline),
            None => Entry::persistent(value),
        };
        self.inner.table.write().insert(key, entry);
    }

    /// Stores `value` under `key` with no deadline
    pub fn set_persistent(&self, key: impl Into<String>, value: impl Into<String>) {
        self.inner
            .table
            .write()
            .insert(key.into(), Entry::persistent(value));
    }

    /// Retrieves a value by key
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    /// An expired entry is removed by this call.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.read_live(key, |entry| entry.value().to_owned())
    }

    /// Checks if `key` holds a live entry; exactly when [`get`](Self::get)
    /// would return `Some`, including the removal of an expired entry.
    #[must_use]
    pub fn exists(&self, key: &str) -> bool {
        self.read_live(key, |_| ()).is_some()
    }

    /// Shared lookup path of `get` and `exists`.
    ///
    /// The upgradable guard lets live hits run alongside plain readers while
    /// keeping the staleness check and the removal in one critical section.
    fn read_live<R>(&self, key: &str, read: impl FnOnce(&Entry) -> R) -> Option<R> {
        let now = Instant::now();
        let table = self.inner.table.upgradable_read();
        let entry = table.get(key)?;
        if !entry.is_expired_at(now) {
            return Some(read(entry));
        }

        let mut table = RwLockUpgradableReadGuard::upgrade(table);
        table.remove(key);
        tracing::trace!(key, "evicted expired entry on read");
        None
    }

    /// Removes `key` if present
    pub fn delete(&self, key: &str) {
        self.inner.table.write().remove(key);
    }

    /// Returns a snapshot of every key in the table
    ///
    /// Unlike [`get`](Self::get), this does not filter by expiry: keys whose
    /// deadline has passed are listed until a read or a sweep removes them.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.inner.table.read().keys().cloned().collect()
    }

    /// Returns the number of entries in the table (including expired ones)
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.table.read().len()
    }

    /// Returns `true` if the table holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.table.read().is_empty()
    }

    /// Runs one sweep pass right now and returns the number of entries removed
    #[must_use = "returns the number of entries removed"]
    pub fn purge_expired(&self) -> usize {
        self.inner.sweep_expired()
    }

    /// Returns the configured sweep interval
    #[must_use]
    pub fn sweep_interval(&self) -> Duration {
        self.inner.sweep_interval
    }

    /// Returns `true` while a background sweep task is running
    #[must_use]
    pub fn is_sweeping(&self) -> bool {
        self.inner
            .sweeper
            .lock()
            .as_ref()
            .is_some_and(Sweeper::is_running)
    }

    /// Starts the background sweep task on the current Tokio runtime
    ///
    /// Does nothing if the sweep interval is zero or a sweep task is already
    /// running for this cache.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::NoRuntime`] when called outside a Tokio runtime.
    pub fn start_background_sweep(&self) -> Result<(), CacheError> {
        let interval = self.inner.sweep_interval;
        if interval.is_zero() {
            return Ok(());
        }

        let mut sweeper = self.inner.sweeper.lock();
        if sweeper.as_ref().is_some_and(Sweeper::is_running) {
            return Ok(());
        }

        let runtime = tokio::runtime::Handle::try_current().map_err(|_| CacheError::NoRuntime)?;

        // A fresh channel per start so the cache can be restarted after shutdown
        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = runtime.spawn(Self::sweep_task(
            Arc::downgrade(&self.inner),
            interval,
            stop_rx,
        ));
        *sweeper = Some(Sweeper {
            stop_tx,
            task: handle.abort_handle(),
            handle: Some(handle),
        });

        tracing::info!(interval = ?interval, "background sweep started");
        Ok(())
    }

    /// Stops the background sweep task and waits for it to exit
    ///
    /// A pass already in progress completes; no pass starts afterwards.
    /// Entries are left in place. Calling this with no task running is a
    /// no-op, and the sweep may be started again once this returns. Until
    /// then the task still occupies the cache, so a concurrent
    /// `start_background_sweep` does nothing.
    pub async fn shutdown(&self) {
        let handle = {
            let mut slot = self.inner.sweeper.lock();
            let Some(sweeper) = slot.as_mut() else {
                return;
            };
            // The task may already be gone, in which case nobody is listening
            let _ = sweeper.stop_tx.send(true);
            sweeper.handle.take()
        };
        // Another shutdown is already joining this task
        let Some(handle) = handle else {
            return;
        };

        if let Err(err) = handle.await {
            tracing::warn!(error = %err, "background sweep task ended abnormally");
        }

        {
            let mut slot = self.inner.sweeper.lock();
            // A start may have replaced the finished task in the meantime
            if slot.as_ref().is_some_and(Sweeper::is_stopping) {
                *slot = None;
            }
        }

        tracing::info!("background sweep stopped");
    }

    /// Background task that periodically removes expired entries
    ///
    /// Holds only a weak reference so a dropped cache is freed; dropping the
    /// cache also drops the stop sender, which ends the loop.
    async fn sweep_task(
        inner: Weak<CacheInner>,
        interval: Duration,
        mut stop_rx: watch::Receiver<bool>,
    ) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // Skip the first immediate tick - the first pass runs one interval after start
        ticker.tick().await;

        loop {
            tokio::select! {
                biased;

                changed = stop_rx.changed() => {
                    if changed.is_err() || *stop_rx.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    let Some(inner) = inner.upgrade() else {
                        break;
                    };
                    let removed = inner.sweep_expired();
                    if removed > 0 {
                        tracing::debug!(removed, "background sweep removed expired entries");
                    }
                }
            }
        }
    }

    /// Stores an entry whose deadline has already passed (for testing purposes)
    #[cfg(test)]
    fn insert_expired(&self, key: impl Into<String>, value: impl Into<String>) {
        let expire_at = Instant::now() - Duration::from_secs(1);
        self.inner
            .table
            .write()
            .insert(key.into(), Entry::new(value, expire_at));
    }
}

impl Default for TtlCache {
    fn default() -> Self {
        Self::with_config(CacheConfig::default())
    }
}

impl fmt::Debug for TtlCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtlCache")
            .field("len", &self.len())
            .field("sweep_interval", &self.inner.sweep_interval)
            .field("sweeping", &self.is_sweeping())
            .finish()
    }
}
