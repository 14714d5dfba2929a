//! Shared Cache Handle
//!
//! Thread-safe, cheaply cloneable front for a [`CacheStore`].

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::cache::{CacheSettings, CacheStats, CacheStore};

// == Entity Cache ==
/// Thread-safe cache handle used by the service layer.
///
/// Every operation takes the lock for its whole duration and never awaits,
/// so concurrent callers observe each write either fully or not at all.
pub struct EntityCache<K, V> {
    inner: Arc<Mutex<CacheStore<K, V>>>,
}

impl<K, V> Clone for EntityCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> fmt::Debug for EntityCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityCache").finish_non_exhaustive()
    }
}

impl<K, V> EntityCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    pub fn new(settings: CacheSettings) -> Self {
        Self {
            inner: Arc::new(Mutex::new(CacheStore::new(settings))),
        }
    }

    /// Returns the fresh value for `key`, or `None`.
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.lock().get(key)
    }

    /// Inserts or replaces the value for `key`.
    pub fn put(&self, key: K, value: V) {
        self.inner.lock().put(key, value);
    }

    /// Removes `key` if present; a missing key is a no-op.
    pub fn invalidate(&self, key: &K) {
        self.inner.lock().invalidate(key);
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    /// Starts a read-through fill. Take the ticket before fetching from the
    /// backing store and hand the fetched value to [`FillTicket::fill`].
    pub fn begin_fill(&self) -> FillTicket<K, V> {
        let ticket = self.inner.lock().begin_fill();
        FillTicket {
            inner: Arc::clone(&self.inner),
            ticket,
            done: false,
        }
    }

    pub fn cleanup_expired(&self) -> usize {
        self.inner.lock().cleanup_expired()
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

// == Fill Ticket ==
/// A pending read-through fill.
///
/// A value fetched under the ticket is only cached if no put or invalidate
/// hit the same key in the meantime, so a slow read never overwrites a newer
/// write. Dropping the ticket unused abandons the fill.
pub struct FillTicket<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    inner: Arc<Mutex<CacheStore<K, V>>>,
    ticket: u64,
    done: bool,
}

impl<K, V> FillTicket<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Caches `value` unless a write overtook this read. Returns whether it was cached.
    pub fn fill(mut self, key: K, value: V) -> bool {
        self.done = true;
        self.inner.lock().fill(key, self.ticket, value)
    }
}

impl<K, V> Drop for FillTicket<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    fn drop(&mut self) {
        if !self.done {
            self.inner.lock().end_fill();
        }
    }
}
