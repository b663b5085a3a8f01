//! Internal storage implementation for the cache.
//!
//! A thread-safe map from key to [`Entry`], with no expiry logic of its own.
//! Eviction is decided by the timer tasks; the store only offers the
//! generation-guarded compare-and-remove those tasks rely on.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::entry::Entry;
use crate::scheduler::EvictionHandle;

/// Thread-safe key/value store used by `TimedCache`.
///
/// This is the internal implementation; users interact with `TimedCache`.
#[derive(Debug)]
pub(crate) struct Store<K, V> {
    entries: RwLock<HashMap<K, Entry<V>>>,
}

impl<K, V> Store<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub(crate) fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Insert or replace the entry for `key`.
    ///
    /// Replacing cancels the previous entry's pending eviction in the same
    /// critical section that installs the new value, so no observer can see
    /// the old timer outlive the old value.
    pub(crate) fn put(&self, key: K, value: V, generation: u64) {
        let mut entries = match self.write_lock() {
            Some(entries) => entries,
            None => return, // Lock poisoned, silently fail
        };

        if let Some(previous) = entries.remove(&key) {
            previous.cancel_eviction();
        }
        entries.insert(key, Entry::new(value, generation));
    }

    /// Attach the eviction timer to the entry for `key`, provided the entry
    /// with that exact generation is still current.
    ///
    /// Returns `false` — after cancelling the handle — when the entry was
    /// replaced or already evicted in the window between `put` and arming.
    pub(crate) fn arm(&self, key: &K, generation: u64, handle: EvictionHandle) -> bool {
        let mut entries = match self.write_lock() {
            Some(entries) => entries,
            None => return false,
        };

        match entries.get_mut(key) {
            Some(entry) if entry.generation() == generation => {
                entry.arm(handle);
                true
            }
            _ => {
                handle.cancel();
                false
            }
        }
    }

    /// Get a clone of the value for `key`, if present.
    pub(crate) fn get(&self, key: &K) -> Option<V> {
        let entries = self.read_lock()?;
        entries.get(key).map(|entry| entry.value().clone())
    }

    /// Remove the entry for `key` only if its generation still matches the
    /// one captured at schedule time, returning the removed value.
    ///
    /// A timer firing after its entry was superseded finds a different
    /// generation here and removes nothing.
    pub(crate) fn remove_if_current(&self, key: &K, generation: u64) -> Option<V> {
        let mut entries = self.write_lock()?;

        match entries.get(key) {
            Some(entry) if entry.generation() == generation => entries
                .remove(key)
                .map(|entry| entry.into_value()),
            _ => None,
        }
    }

    /// Whether the store currently holds `key`.
    pub(crate) fn contains(&self, key: &K) -> bool {
        match self.read_lock() {
            Some(entries) => entries.contains_key(key),
            None => false,
        }
    }

    /// Number of live entries.
    pub(crate) fn len(&self) -> usize {
        match self.read_lock() {
            Some(entries) => entries.len(),
            None => 0,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Private helper methods

    /// Acquire a read lock, returning None if poisoned.
    fn read_lock(&self) -> Option<RwLockReadGuard<'_, HashMap<K, Entry<V>>>> {
        self.entries.read().ok()
    }

    /// Acquire a write lock, returning None if poisoned.
    fn write_lock(&self) -> Option<RwLockWriteGuard<'_, HashMap<K, Entry<V>>>> {
        self.entries.write().ok()
    }
}
