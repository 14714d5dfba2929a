//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and TTL expiration.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use crate::cache::{current_timestamp_ms, CacheEntry, CacheStats, LruTracker};

// == Cache Settings ==
/// Sizing and freshness parameters for a cache instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    /// How long an entry stays visible after it was written
    pub ttl: Duration,
    /// Maximum number of resident entries
    pub max_entries: usize,
}

impl CacheSettings {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self { ttl, max_entries }
    }
}

// == Cache Store ==
/// Single-threaded cache engine with LRU eviction and expire-after-write TTL.
///
/// Wrap it in [`EntityCache`](crate::cache::EntityCache) to share it between tasks.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Key-value storage
    entries: HashMap<K, CacheEntry<V>>,
    /// LRU access tracker
    lru: LruTracker<K>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Freshness window applied to every write
    ttl: Duration,
    /// Bumped by every put and invalidate
    write_clock: u64,
    /// Clock value of the last write per key, kept only while fills are pending
    last_write: HashMap<K, u64>,
    /// Reads between a store fetch and their cache fill
    pending_fills: usize,
}

impl<K, V> CacheStore<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates an empty store. A capacity of zero is treated as one.
    pub fn new(settings: CacheSettings) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries: settings.max_entries.max(1),
            ttl: settings.ttl,
            write_clock: 0,
            last_write: HashMap::new(),
            pending_fills: 0,
        }
    }

    fn record_write(&mut self, key: &K) {
        self.write_clock += 1;
        if self.pending_fills > 0 {
            self.last_write.insert(key.clone(), self.write_clock);
        }
    }

    // == Put ==
    /// Inserts or replaces the entry for `key`, resetting its freshness.
    ///
    /// A new key arriving at capacity first drops expired entries; if the
    /// store is still full, the least recently used entry is evicted.
    pub fn put(&mut self, key: K, value: V) {
        let is_overwrite = self.entries.contains_key(&key);

        if !is_overwrite && self.entries.len() >= self.max_entries {
            self.cleanup_expired();
        }

        if !is_overwrite && self.entries.len() >= self.max_entries {
            if let Some(evicted_key) = self.lru.evict_oldest() {
                self.entries.remove(&evicted_key);
                self.stats.record_eviction();
            }
        }

        self.record_write(&key);
        self.entries.insert(key.clone(), CacheEntry::new(value, self.ttl));
        self.lru.touch(&key);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Fill ==
    /// Registers a read about to fetch from the backing store. Returns the
    /// ticket to pass to [`fill`](Self::fill) or [`end_fill`](Self::end_fill).
    pub fn begin_fill(&mut self) -> u64 {
        self.pending_fills += 1;
        self.write_clock
    }

    /// Caches a value fetched under `ticket`, unless `key` was put or
    /// invalidated since the ticket was issued. Returns whether it was cached.
    ///
    /// Ends the fill either way.
    pub fn fill(&mut self, key: K, ticket: u64, value: V) -> bool {
        let overtaken = self
            .last_write
            .get(&key)
            .is_some_and(|&written| written > ticket);
        if !overtaken {
            self.put(key, value);
        }
        self.end_fill();
        !overtaken
    }

    /// Drops a pending fill without caching anything.
    pub fn end_fill(&mut self) {
        self.pending_fills = self.pending_fills.saturating_sub(1);
        if self.pending_fills == 0 {
            self.last_write.clear();
        }
    }

    // == Get ==
    /// Returns the value for `key` if present and fresh.
    ///
    /// Expired entries are removed on sight and counted as misses.
    pub fn get(&mut self, key: &K) -> Option<V> {
        let expired = match self.entries.get(key) {
            None => {
                self.stats.record_miss();
                return None;
            }
            Some(entry) => entry.is_expired(),
        };

        if expired {
            self.entries.remove(key);
            self.lru.remove(key);
            self.stats.set_total_entries(self.entries.len());
            self.stats.record_miss();
            return None;
        }

        self.stats.record_hit();
        self.lru.touch(key);
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Invalidate ==
    /// Removes the entry for `key` if present. Returns whether one was removed.
    ///
    /// Counts as a write for pending fills even when nothing was cached.
    pub fn invalidate(&mut self, key: &K) -> bool {
        self.record_write(key);
        if self.entries.remove(key).is_some() {
            self.lru.remove(key);
            self.stats.record_invalidation();
            self.stats.set_total_entries(self.entries.len());
            true
        } else {
            false
        }
    }

    /// Checks whether a fresh entry exists, without touching recency or stats.
    pub fn contains(&self, key: &K) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired())
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Cleanup Expired ==
    /// Removes all expired entries. Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = current_timestamp_ms();
        let expired_keys: Vec<K> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        self.stats.set_total_entries(self.entries.len());
        expired_keys.len()
    }

    /// Returns the current number of resident entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
