//! The main cache interface.
//!
//! This module provides the primary `TimedCache` type that users interact
//! with. It wires the store, the expiry scheduler, the event sink, and the
//! lifecycle state together behind a clean, thread-safe API.

use std::fmt;
use std::hash::Hash;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::{CacheConfig, TimeUnit};
use crate::error::{CacheError, CacheResult};
use crate::events::{CacheEvents, NoopEvents};
use crate::lifecycle::{CacheState, Lifecycle};
use crate::scheduler::Scheduler;
use crate::stats::{CacheStats, StatsSnapshot};
use crate::storage::Store;

/// A thread-safe, in-memory key/value cache where every entry carries its
/// own time-to-live.
///
/// Unlike caches with a single uniform TTL or a capacity bound, the lifetime
/// here is decided per item at `add` time, which suits workloads like
/// credential or token caching where each object knows its own expiry.
/// Eviction is purely timer-driven: each live entry owns exactly one pending
/// timer, and there is no background polling.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use timed_cache::{CacheConfig, TimedCache, TimeUnit};
///
/// let config = CacheConfig::new()
///     .time_unit(TimeUnit::Milliseconds)
///     .build();
/// let cache: TimedCache<&str, &str> = TimedCache::new(config).unwrap();
///
/// // The token outlives the session key
/// cache.add("access-token", "eyJhbGci...", 60_000).unwrap();
/// cache.add("session-key", "s3cr3t", 5_000).unwrap();
///
/// assert_eq!(cache.get(&"access-token").unwrap(), Some("eyJhbGci..."));
/// assert!(cache.contains_key(&"session-key").unwrap());
///
/// cache.shutdown(Duration::from_secs(1));
/// assert!(cache.get(&"access-token").is_err());
/// ```
///
/// # Thread safety
///
/// Cloning a `TimedCache` creates a new handle to the same underlying data;
/// handles can be shared freely across threads. Eviction timers run on the
/// cache's own scheduler thread, concurrently with callers.
pub struct TimedCache<K, V> {
    inner: Arc<Inner<K, V>>,
}

struct Inner<K, V> {
    store: Store<K, V>,
    scheduler: Scheduler,
    events: Arc<dyn CacheEvents<K, V>>,
    stats: CacheStats,
    lifecycle: Lifecycle,
    time_unit: TimeUnit,
    /// Stamp for the next `add`; see `Entry::generation`.
    generations: AtomicU64,
}

impl<K, V> TimedCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create a new cache with the given configuration and no event sink.
    ///
    /// # Errors
    /// Fails with [`CacheError::MissingConfiguration`] if the configuration
    /// lacks a time unit, and with [`CacheError::Scheduler`] if the eviction
    /// runtime cannot be started.
    ///
    /// # Example
    /// ```
    /// use timed_cache::{CacheConfig, TimedCache, TimeUnit};
    ///
    /// let config = CacheConfig::new().time_unit(TimeUnit::Seconds).build();
    /// let cache: TimedCache<String, String> = TimedCache::new(config).unwrap();
    /// # cache.shutdown(std::time::Duration::from_secs(1));
    /// ```
    pub fn new(config: CacheConfig) -> CacheResult<Self> {
        Self::with_events(config, Arc::new(NoopEvents))
    }

    /// Create a new cache that reports entry transitions to `events`.
    ///
    /// The sink's callbacks run synchronously: added/retrieved/miss on the
    /// calling thread, evicted on the scheduler's timer thread.
    pub fn with_events(
        config: CacheConfig,
        events: Arc<dyn CacheEvents<K, V>>,
    ) -> CacheResult<Self> {
        let time_unit = config
            .time_unit
            .ok_or(CacheError::MissingConfiguration("time unit"))?;
        let scheduler = Scheduler::new(config.eviction_threads.unwrap_or(1))?;

        Ok(Self {
            inner: Arc::new(Inner {
                store: Store::new(),
                scheduler,
                events,
                stats: CacheStats::new(),
                lifecycle: Lifecycle::new(),
                time_unit,
                generations: AtomicU64::new(0),
            }),
        })
    }

    /// Add an item to the cache and set its time-to-live, in the time unit
    /// the cache was constructed with.
    ///
    /// If the key is already present, its value is replaced and its lifetime
    /// reset: the previous timer is cancelled and the new TTL governs
    /// eviction, whether longer or shorter than before.
    ///
    /// A non-positive `ttl` discards the item immediately. This is a
    /// deliberate no-op, not an error, and it leaves any live entry for the
    /// same key (and that entry's timer) untouched.
    ///
    /// # Errors
    /// Fails with [`CacheError::Terminated`] after `shutdown`.
    ///
    /// # Example
    /// ```
    /// use timed_cache::{CacheConfig, TimedCache, TimeUnit};
    ///
    /// let config = CacheConfig::new().time_unit(TimeUnit::Milliseconds).build();
    /// let cache = TimedCache::new(config).unwrap();
    ///
    /// cache.add("key", "value", 30_000).unwrap();
    /// cache.add("key", "value", -1).unwrap(); // discarded, entry untouched
    /// assert!(cache.contains_key(&"key").unwrap());
    /// # cache.shutdown(std::time::Duration::from_secs(1));
    /// ```
    pub fn add(&self, key: K, value: V, ttl: i64) -> CacheResult<()> {
        self.inner
            .lifecycle
            .ensure_alive("trying to add entry after termination")?;

        if ttl <= 0 {
            debug!(ttl, "discarding entry with non-positive ttl");
            self.inner.stats.record_discard();
            return Ok(());
        }

        let generation = self.inner.generations.fetch_add(1, Ordering::Relaxed);
        let delay = self.inner.time_unit.to_duration(ttl as u64);

        // Replace the slot; any previous timer is cancelled in the same
        // critical section, so the new TTL prevails
        self.inner.store.put(key.clone(), value.clone(), generation);
        self.inner.stats.record_add();
        self.inner.events.on_entry_added(&key, &value);

        // Arm the eviction timer for this exact generation. The timer is
        // harmless if this entry gets superseded first: the generation check
        // in `evict` refuses to remove anything newer.
        let handle = self.inner.scheduler.schedule(delay, {
            let cache = Arc::downgrade(&self.inner);
            let key = key.clone();
            move || evict(cache, key, generation)
        });
        self.inner.store.arm(&key, generation, handle);
        debug!(generation, ttl, "entry added, eviction scheduled");

        Ok(())
    }

    /// Retrieve the value for `key`, if present at this moment.
    ///
    /// Does not extend or alter the entry's TTL and does not remove it.
    /// Fires the entry-retrieved event on a hit and the cache-miss event on
    /// a miss.
    ///
    /// # Errors
    /// Fails with [`CacheError::Terminated`] after `shutdown`.
    ///
    /// # Example
    /// ```
    /// use timed_cache::{CacheConfig, TimedCache, TimeUnit};
    ///
    /// let config = CacheConfig::new().time_unit(TimeUnit::Seconds).build();
    /// let cache = TimedCache::new(config).unwrap();
    ///
    /// cache.add("key", "value", 60).unwrap();
    /// assert_eq!(cache.get(&"key").unwrap(), Some("value"));
    /// assert_eq!(cache.get(&"missing").unwrap(), None);
    /// # cache.shutdown(std::time::Duration::from_secs(1));
    /// ```
    pub fn get(&self, key: &K) -> CacheResult<Option<V>> {
        self.inner
            .lifecycle
            .ensure_alive("trying to retrieve entry after termination")?;

        match self.inner.store.get(key) {
            Some(value) => {
                self.inner.stats.record_hit();
                self.inner.events.on_entry_retrieved(key, &value);
                Ok(Some(value))
            }
            None => {
                self.inner.stats.record_miss();
                self.inner.events.on_cache_miss(key);
                Ok(None)
            }
        }
    }

    /// Whether this cache contains `key` at the time of the call.
    ///
    /// Fires no events.
    ///
    /// # Errors
    /// Fails with [`CacheError::Terminated`] after `shutdown`.
    pub fn contains_key(&self, key: &K) -> CacheResult<bool> {
        self.inner
            .lifecycle
            .ensure_alive("calling contains_key after termination")?;

        Ok(self.inner.store.contains(key))
    }

    /// Shut down this cache, draining the eviction scheduler for at most
    /// `timeout` before marking the cache terminated.
    ///
    /// Evictions already firing are allowed to complete (and report their
    /// events); timers still sleeping are cancelled. Entries still pending
    /// at shutdown are not an error. Idempotent; after the first call every
    /// `add`/`get`/`contains_key` fails with [`CacheError::Terminated`].
    pub fn shutdown(&self, timeout: Duration) {
        debug!("shutting down cache");
        self.inner.scheduler.shutdown(timeout);
        self.inner.lifecycle.terminate();
    }

    /// The number of live entries.
    ///
    /// Available in any lifecycle state, for diagnostics.
    pub fn len(&self) -> usize {
        self.inner.store.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.store.is_empty()
    }

    /// The cache's lifecycle state.
    pub fn state(&self) -> CacheState {
        self.inner.lifecycle.state()
    }

    /// Get a snapshot of the cache statistics.
    ///
    /// # Example
    /// ```
    /// use timed_cache::{CacheConfig, TimedCache, TimeUnit};
    ///
    /// let config = CacheConfig::new().time_unit(TimeUnit::Seconds).build();
    /// let cache = TimedCache::new(config).unwrap();
    /// cache.add("key", "value", 60).unwrap();
    /// let _ = cache.get(&"key");     // Hit
    /// let _ = cache.get(&"missing"); // Miss
    ///
    /// let stats = cache.stats();
    /// assert_eq!(stats.hits, 1);
    /// assert_eq!(stats.misses, 1);
    /// # cache.shutdown(std::time::Duration::from_secs(1));
    /// ```
    pub fn stats(&self) -> StatsSnapshot {
        self.inner.stats.snapshot()
    }
}

/// Timer fire callback: remove the entry this timer was armed for, if it is
/// still the current one, and announce the eviction.
fn evict<K, V>(cache: Weak<Inner<K, V>>, key: K, generation: u64)
where
    K: Eq + Hash,
    V: Clone,
{
    // The cache may be torn down while this timer was in flight
    let inner = match cache.upgrade() {
        Some(inner) => inner,
        None => return,
    };

    // Only the value this timer was scheduled for may be removed; a replaced
    // entry carries a newer generation and is left alone
    let value = match inner.store.remove_if_current(&key, generation) {
        Some(value) => value,
        None => return,
    };

    inner.stats.record_eviction();
    debug!(generation, "entry evicted at end of ttl");

    // A panicking sink must not take the eviction worker down with it
    let announced =
        panic::catch_unwind(AssertUnwindSafe(|| inner.events.on_entry_evicted(&key, &value)));
    if announced.is_err() {
        warn!(generation, "entry-evicted event sink panicked; eviction already applied");
    }
}

impl<K, V> Clone for TimedCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> fmt::Debug for TimedCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimedCache")
            .field("state", &self.inner.lifecycle.state())
            .field("entries", &self.inner.store.len())
            .finish_non_exhaustive()
    }
}
