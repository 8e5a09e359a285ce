//! The process-wide curve cache: content-addressed storage plus
//! single-flight build coordination.
//!
//! Storage shape (`DashMap` of `RwLock`-guarded entries, atomic hit/miss/
//! eviction counters, LRU by last-access) mirrors the engine's curve
//! cache. The in-flight table has no counterpart there — it exists
//! because this cache is keyed by a content hash that many concurrent
//! requests can land on at once, where the engine's is keyed by a curve
//! id that a single owner updates.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use parking_lot::RwLock;
use tokio::sync::Notify;

use crate::cache_key::CacheKey;
use crate::serializer::CachedCurveData;

/// One cached entry: the stored pillars plus bookkeeping for LRU
/// eviction.
struct CacheEntry {
    data: CachedCurveData,
    inserted_at: Instant,
    last_accessed: RwLock<Instant>,
    access_count: AtomicU64,
}

impl CacheEntry {
    fn new(data: CachedCurveData) -> Self {
        let now = Instant::now();
        Self {
            data,
            inserted_at: now,
            last_accessed: RwLock::new(now),
            access_count: AtomicU64::new(0),
        }
    }

    fn touch(&self) {
        *self.last_accessed.write() = Instant::now();
        self.access_count.fetch_add(1, Ordering::Relaxed);
    }

    fn age(&self) -> Duration {
        self.last_accessed.read().elapsed()
    }
}

/// Hit/miss/eviction counters for a [`CurveCacheStore`].
#[derive(Debug, Default, Clone, Copy)]
pub struct CacheStats {
    /// Lookups that found a usable entry.
    pub hits: u64,
    /// Lookups that found nothing and had to build.
    pub misses: u64,
    /// Lookups that joined an in-flight build instead of starting one.
    pub joined_in_flight: u64,
    /// Entries removed to stay within capacity.
    pub evictions: u64,
}

impl CacheStats {
    /// Fraction of lookups served without a build, including joined
    /// in-flight builds.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Content-addressed curve cache with single-flight build coordination.
///
/// A lookup that misses registers itself as the in-flight builder for
/// its key; concurrent lookups for the same key wait on that builder's
/// [`Notify`] and re-check the cache once it fires, rather than
/// duplicating the bootstrap. A failed build clears the in-flight entry
/// without inserting anything, so the next lookup retries from scratch.
pub struct CurveCacheStore {
    entries: DashMap<CacheKey, Arc<CacheEntry>>,
    in_flight: DashMap<CacheKey, Arc<Notify>>,
    max_entries: usize,
    hits: AtomicU64,
    misses: AtomicU64,
    joined_in_flight: AtomicU64,
    evictions: AtomicU64,
}

impl CurveCacheStore {
    /// Creates an empty store holding at most `max_entries` curves.
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            in_flight: DashMap::new(),
            max_entries,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            joined_in_flight: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Returns a cached entry, touching its LRU timestamp, or `None` on a
    /// miss.
    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<CachedCurveData> {
        match self.entries.get(key) {
            Some(entry) => {
                entry.touch();
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.data.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    #[must_use]
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Inserts a freshly built entry, evicting the least-recently-used
    /// entry first if the store is at capacity.
    pub fn put(&self, key: CacheKey, data: CachedCurveData) {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            self.evict_oldest();
        }
        self.entries.insert(key, Arc::new(CacheEntry::new(data)));
    }

    fn evict_oldest(&self) {
        let oldest = self
            .entries
            .iter()
            .max_by_key(|entry| entry.value().age())
            .map(|entry| entry.key().clone());
        if let Some(key) = oldest {
            self.entries.remove(&key);
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Registers this key as having a build in flight, or returns the
    /// existing in-flight handle if another caller beat us to it.
    ///
    /// Returns `(notify, is_leader)`: the leader proceeds to build and
    /// must call [`Self::finish_build`] when done; followers await
    /// `notify.notified()` and then re-check the cache.
    pub fn start_or_join_build(&self, key: &CacheKey) -> (Arc<Notify>, bool) {
        let candidate = Arc::new(Notify::new());
        let entry = self
            .in_flight
            .entry(key.clone())
            .or_insert_with(|| candidate.clone());
        let notify = entry.value().clone();
        let is_leader = Arc::ptr_eq(&notify, &candidate);
        if !is_leader {
            self.joined_in_flight.fetch_add(1, Ordering::Relaxed);
        }
        (notify, is_leader)
    }

    /// Clears the in-flight marker for a key and wakes every follower
    /// waiting on it, whether the build succeeded or failed.
    pub fn finish_build(&self, key: &CacheKey) {
        if let Some((_, notify)) = self.in_flight.remove(key) {
            notify.notify_waiters();
        }
    }

    pub fn remove(&self, key: &CacheKey) {
        self.entries.remove(key);
    }

    pub fn clear(&self) {
        self.entries.clear();
        self.in_flight.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Age of the oldest still-cached entry, or `None` if the store is
    /// empty.
    #[must_use]
    pub fn oldest_entry_age(&self) -> Option<Duration> {
        self.entries.iter().map(|e| e.value().age()).max()
    }

    #[must_use]
    pub fn inserted_age(&self, key: &CacheKey) -> Option<Duration> {
        self.entries.get(key).map(|e| e.value().inserted_at.elapsed())
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            joined_in_flight: self.joined_in_flight.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    pub fn reset_stats(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.joined_in_flight.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
    }
}
