//! In-memory cache for API responses.
//!
//! Stores raw response bodies keyed by endpoint path. Entries live for a
//! fixed TTL and the cache holds a bounded number of entries, evicting the
//! oldest-inserted entry when full.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

/// Counters describing cache behavior since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub insertions: u64,
    pub evictions: u64,
}

#[derive(Debug)]
struct CacheEntry {
    body: String,
    stored_at: Instant,
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    /// Insertion order of live keys, oldest at the front.
    order: VecDeque<String>,
    stats: CacheStats,
}

/// Bounded TTL cache for response bodies.
///
/// Expiry is lazy: entries are only checked against the TTL when looked up,
/// and an expired entry counts as a miss. When the cache is full the entry
/// inserted earliest is evicted, regardless of how recently it was read.
/// Re-inserting a live key refreshes its body and timestamp but keeps its
/// original eviction position.
#[derive(Debug)]
pub struct ResponseCache {
    ttl: Duration,
    capacity: usize,
    enabled: bool,
    inner: Mutex<CacheInner>,
}

impl ResponseCache {
    /// Create a cache holding up to `capacity` entries for `ttl` each.
    ///
    /// A zero capacity produces a cache that never stores anything.
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity,
            enabled: capacity > 0,
            inner: Mutex::new(CacheInner::default()),
        }
    }

    /// Create a cache that never stores anything.
    pub fn disabled() -> Self {
        Self {
            ttl: Duration::ZERO,
            capacity: 0,
            enabled: false,
            inner: Mutex::new(CacheInner::default()),
        }
    }

    /// Whether this cache stores entries at all.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Look up a fresh entry, removing it if it has outlived the TTL.
    pub async fn lookup(&self, key: &str) -> Option<String> {
        if !self.enabled {
            return None;
        }

        let mut inner = self.inner.lock().await;

        match inner.entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => {
                let body = entry.body.clone();
                inner.stats.hits += 1;
                debug!(key = key, "Cache hit");
                Some(body)
            }
            Some(_) => {
                inner.entries.remove(key);
                inner.order.retain(|k| k != key);
                inner.stats.misses += 1;
                debug!(key = key, "Cache entry expired");
                None
            }
            None => {
                inner.stats.misses += 1;
                debug!(key = key, "Cache miss");
                None
            }
        }
    }

    /// Store a response body under `key`, evicting the oldest entries if the
    /// cache is at capacity.
    pub async fn insert(&self, key: &str, body: String) {
        if !self.enabled {
            return;
        }

        let mut inner = self.inner.lock().await;
        let now = Instant::now();

        if let Some(entry) = inner.entries.get_mut(key) {
            // Refresh in place; the key keeps its eviction position.
            entry.body = body;
            entry.stored_at = now;
            inner.stats.insertions += 1;
            return;
        }

        while inner.entries.len() >= self.capacity {
            match inner.order.pop_front() {
                Some(oldest) => {
                    if inner.entries.remove(&oldest).is_some() {
                        inner.stats.evictions += 1;
                        debug!(key = oldest.as_str(), "Cache evicted oldest entry");
                    }
                }
                None => break,
            }
        }

        inner.order.push_back(key.to_string());
        inner.entries.insert(key.to_string(), CacheEntry { body, stored_at: now });
        inner.stats.insertions += 1;
        debug!(key = key, "Cache stored");
    }

    /// Drop every entry. Counters are kept.
    pub async fn clear(&self) {
        let mut inner = self.inner.lock().await;
        inner.entries.clear();
        inner.order.clear();
    }

    /// Get cache statistics.
    pub async fn stats(&self) -> CacheStats {
        self.inner.lock().await.stats
    }

    /// Number of entries currently stored, including not-yet-expired ones.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }
}
