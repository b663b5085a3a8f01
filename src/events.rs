//! Event hooks fired over the lifetime of a cache entry.
//!
//! Implementors observe cache activity by overriding any subset of the four
//! methods; every method defaults to a no-op, so a sink only has to name the
//! transitions it cares about.
//!
//! Callbacks are invoked synchronously on the thread performing the
//! triggering operation: the calling thread for added/retrieved/miss, the
//! eviction worker for evicted. Keep them cheap. A panicking callback
//! surfaces to the caller of `add`/`get`; on the eviction worker it is caught
//! and logged instead, so one misbehaving sink cannot stop expiry.
//!
//! ```
//! use timed_cache::CacheEvents;
//!
//! struct LogEvictions;
//!
//! impl CacheEvents<String, String> for LogEvictions {
//!     fn on_entry_evicted(&self, key: &String, _value: &String) {
//!         println!("expired: {key}");
//!     }
//! }
//! ```

/// Observer for cache entry lifecycle events.
pub trait CacheEvents<K, V>: Send + Sync {
    /// An entry was inserted, or an existing key was replaced.
    fn on_entry_added(&self, key: &K, value: &V) {
        let _ = (key, value);
    }

    /// An entry reached its TTL and was removed by its timer.
    fn on_entry_evicted(&self, key: &K, value: &V) {
        let _ = (key, value);
    }

    /// A `get` found the key.
    fn on_entry_retrieved(&self, key: &K, value: &V) {
        let _ = (key, value);
    }

    /// A `get` did not find the key.
    fn on_cache_miss(&self, key: &K) {
        let _ = key;
    }
}

/// The default sink: every event is a no-op.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEvents;

impl<K, V> CacheEvents<K, V> for NoopEvents {}
