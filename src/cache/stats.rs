//! Cache Statistics Module
//!
//! Counters and the point-in-time report returned by `TtlCache::stats`.

use serde::Serialize;

// == Counters ==
/// Monotonic counters maintained across the cache lifetime.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheCounters {
    /// Entries removed by LRU eviction
    pub evictions: u64,
    /// Entries removed because their TTL elapsed
    pub expirations: u64,
}

impl CacheCounters {
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }
}

// == Item Report ==
/// Per-entry statistics line, one per live entry.
#[derive(Debug, Clone, Serialize)]
pub struct ItemReport {
    pub key: String,
    pub hit_count: u64,
    pub age_ms: u64,
    pub ttl_remaining_ms: u64,
}

// == Cache Report ==
/// Snapshot of cache state and statistics.
#[derive(Debug, Clone, Serialize)]
pub struct CacheReport {
    /// Current number of live entries
    pub size: usize,
    /// Configured capacity
    pub max_size: usize,
    /// Approximate hit rate: live-entry hits over hits plus entry count
    pub hit_rate: f64,
    /// Entries removed by LRU eviction so far
    pub evictions: u64,
    /// Entries removed by TTL expiration so far
    pub expirations: u64,
    /// Per-entry lines, sorted by descending hit count
    pub items: Vec<ItemReport>,
}

impl CacheReport {
    /// Builds a report from live items and lifetime counters.
    ///
    /// `items` are sorted descending by hit count before being stored.
    pub fn new(max_size: usize, counters: CacheCounters, mut items: Vec<ItemReport>) -> Self {
        items.sort_by(|a, b| b.hit_count.cmp(&a.hit_count));
        let size = items.len();
        let hit_rate = Self::approximate_hit_rate(&items);
        Self {
            size,
            max_size,
            hit_rate,
            evictions: counters.evictions,
            expirations: counters.expirations,
            items,
        }
    }

    /// Approximate hit rate: `total_hits / (total_hits + size)`.
    ///
    /// `total_hits` sums the hit counters of the entries currently live, so
    /// hits on entries that have since expired or been evicted are not
    /// counted, and per-lookup misses are not tracked at all. The figure is
    /// a rough warmness indicator, not a true request-level hit rate.
    fn approximate_hit_rate(items: &[ItemReport]) -> f64 {
        let total_hits: u64 = items.iter().map(|item| item.hit_count).sum();
        let denominator = total_hits + items.len() as u64;
        if denominator == 0 {
            0.0
        } else {
            total_hits as f64 / denominator as f64
        }
    }
}
