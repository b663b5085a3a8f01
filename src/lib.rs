//! # Timed Cache
//!
//! A thread-safe, in-memory key/value cache where every entry carries its
//! own time-to-live.
//!
//! Most caches apply one TTL or one capacity policy to everything they hold.
//! Here the lifetime is a property of the item: each `add` names its own TTL,
//! and each live entry owns exactly one pending eviction timer. That makes
//! the cache a natural fit for objects whose lifetimes differ per instance,
//! such as access tokens or credentials with individual expiries.
//!
//! ## Features
//!
//! - **Per-entry TTL**: lifetime is decided at `add` time, per item
//! - **Timer-driven eviction**: one cancellable timer per entry, no
//!   background polling or sweep
//! - **Thread-safe**: share across threads with `Clone` (uses `Arc`
//!   internally); eviction runs on the cache's own scheduler thread
//! - **Event hooks**: observe added/evicted/retrieved/miss transitions
//!   through the [`CacheEvents`] trait
//! - **Explicit lifecycle**: using a cache after `shutdown` is a loud,
//!   typed error rather than a silent no-op
//!
//! ## Quick Start
//!
//! ```rust
//! use std::time::Duration;
//! use timed_cache::{CacheConfig, TimedCache, TimeUnit};
//!
//! // TTLs for this cache are counted in milliseconds
//! let config = CacheConfig::new()
//!     .time_unit(TimeUnit::Milliseconds)
//!     .build();
//! let cache: TimedCache<String, String> = TimedCache::new(config).unwrap();
//!
//! // Each entry decides how long it lives
//! cache.add("short-lived".into(), "gone soon".into(), 10_000).unwrap();
//! cache.add("long-lived".into(), "sticks around".into(), 60_000).unwrap();
//!
//! assert!(cache.contains_key(&"short-lived".into()).unwrap());
//!
//! // Re-adding a key replaces its value and resets its lifetime
//! cache.add("short-lived".into(), "reprieved".into(), 60_000).unwrap();
//!
//! cache.shutdown(Duration::from_secs(1));
//! ```
//!
//! ## Observing cache activity
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use timed_cache::{CacheConfig, CacheEvents, TimedCache, TimeUnit};
//!
//! struct Audit;
//!
//! impl CacheEvents<String, String> for Audit {
//!     fn on_entry_evicted(&self, key: &String, _value: &String) {
//!         println!("credential expired: {key}");
//!     }
//! }
//!
//! let config = CacheConfig::new().time_unit(TimeUnit::Seconds).build();
//! let cache = TimedCache::with_events(config, Arc::new(Audit)).unwrap();
//! cache.add("db-password".into(), "hunter2".into(), 900).unwrap();
//! cache.shutdown(Duration::from_secs(1));
//! ```

// Public API
pub mod cache;
pub mod config;
pub mod error;
pub mod events;
pub mod stats;

pub use cache::TimedCache;
pub use config::{CacheConfig, TimeUnit};
pub use error::{CacheError, CacheResult};
pub use events::{CacheEvents, NoopEvents};
pub use lifecycle::CacheState;
pub use stats::{CacheStats, StatsSnapshot};

// Internal modules - not part of the public API
pub(crate) mod entry;
pub(crate) mod lifecycle;
pub(crate) mod scheduler;
pub(crate) mod storage;
