//! Configuration for the timed cache.
//!
//! This module provides a builder pattern for configuring cache behavior,
//! most importantly the time unit in which every TTL passed to `add` is
//! interpreted.

use std::time::Duration;

/// The granularity used to interpret TTL values.
///
/// A cache is constructed with exactly one `TimeUnit`; every `ttl` argument
/// passed to `add` is a count of these units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
}

impl TimeUnit {
    /// Convert an amount of this unit into a `Duration`.
    ///
    /// Saturates on overflow rather than wrapping; a TTL that large never
    /// fires within the life of the process anyway.
    pub fn to_duration(self, amount: u64) -> Duration {
        match self {
            TimeUnit::Microseconds => Duration::from_micros(amount),
            TimeUnit::Milliseconds => Duration::from_millis(amount),
            TimeUnit::Seconds => Duration::from_secs(amount),
            TimeUnit::Minutes => Duration::from_secs(amount.saturating_mul(60)),
            TimeUnit::Hours => Duration::from_secs(amount.saturating_mul(3600)),
        }
    }
}

/// Configuration for creating a new cache instance.
///
/// Use the builder pattern to construct configuration:
///
/// ```
/// use timed_cache::{CacheConfig, TimeUnit};
///
/// let config = CacheConfig::new()
///     .time_unit(TimeUnit::Milliseconds)
///     .build();
/// ```
///
/// The time unit is required; `TimedCache::new` rejects a configuration
/// without one.
#[derive(Debug, Clone, Default)]
pub struct CacheConfig {
    /// Granularity for all TTLs handed to this cache. Required.
    pub(crate) time_unit: Option<TimeUnit>,

    /// Number of worker threads backing the eviction scheduler.
    /// `None` means one, matching the one-timer-thread design.
    pub(crate) eviction_threads: Option<usize>,
}

impl CacheConfig {
    /// Create a new configuration builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the time unit in which TTLs are interpreted.
    pub fn time_unit(mut self, unit: TimeUnit) -> Self {
        self.time_unit = Some(unit);
        self
    }

    /// Set the number of threads backing the eviction scheduler.
    ///
    /// One thread is enough for timer-driven eviction unless eviction
    /// callbacks do significant work. Zero is treated as one.
    pub fn eviction_threads(mut self, threads: usize) -> Self {
        self.eviction_threads = if threads == 0 { None } else { Some(threads) };
        self
    }

    /// Build the final configuration.
    pub fn build(self) -> Self {
        self
    }

    /// Get the configured time unit, if set.
    pub fn get_time_unit(&self) -> Option<TimeUnit> {
        self.time_unit
    }

    /// Get the configured eviction thread count, if set.
    pub fn get_eviction_threads(&self) -> Option<usize> {
        self.eviction_threads
    }
}
