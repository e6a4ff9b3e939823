//! Cache Store Module
//!
//! The bounded TTL cache: HashMap storage, LRU eviction at capacity, lazy
//! expiration, regex invalidation, and best-effort snapshot persistence.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::entry::current_timestamp_ms;
use crate::cache::{AccessOrder, CacheCounters, CacheEntry, CacheReport, ItemReport};
use crate::storage::{snapshot, SnapshotRecord, SnapshotStore, SNAPSHOT_KEY};

// == TTL Cache ==
/// Bounded in-memory cache with per-entry TTL and LRU eviction.
///
/// Every operation is synchronous and infallible from the caller's point of
/// view: expiration is a normal miss, eviction is a normal side effect of
/// `set`, and storage faults degrade to logged no-ops. The cache is not
/// internally synchronized; wrap it in a lock to share it across tasks.
#[derive(Debug)]
pub struct TtlCache<T> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<T>>,
    /// Recency order for eviction decisions
    order: AccessOrder,
    /// Lifetime eviction/expiration counters
    counters: CacheCounters,
    /// Maximum number of entries allowed
    capacity: usize,
    /// TTL in milliseconds applied when `set` is called without one
    default_ttl_ms: u64,
    /// Durable store for snapshots, if configured
    storage: Option<Arc<dyn SnapshotStore>>,
}

impl<T: Clone> TtlCache<T> {
    // == Constructor ==
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// A capacity of zero is clamped to one; the size bound could not be
    /// honored otherwise.
    pub fn new(capacity: usize, default_ttl_ms: u64) -> Self {
        Self {
            entries: HashMap::new(),
            order: AccessOrder::new(),
            counters: CacheCounters::default(),
            capacity: capacity.max(1),
            default_ttl_ms,
            storage: None,
        }
    }

    /// Attaches a durable store used by the snapshot operations.
    pub fn with_storage(mut self, storage: Arc<dyn SnapshotStore>) -> Self {
        self.storage = Some(storage);
        self
    }

    // == Set ==
    /// Inserts or overwrites an entry. Always succeeds.
    ///
    /// Expired entries are swept first so they never occupy a slot that
    /// would otherwise force the eviction of a live one. If the key is new
    /// and the cache is full, the least recently used entry is evicted.
    /// The entry is stored with fresh access statistics, whether new or
    /// overwritten.
    pub fn set(&mut self, key: impl Into<String>, value: T, ttl_ms: Option<u64>) {
        self.sweep_expired();
        let ttl = ttl_ms.unwrap_or(self.default_ttl_ms);
        self.insert_entry(key.into(), CacheEntry::new(value, ttl));
    }

    // == Get ==
    /// Returns the value if present and fresh, recording the hit.
    ///
    /// An expired entry is removed on discovery and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<T> {
        if self.discard_if_expired(key) {
            return None;
        }
        let entry = self.entries.get_mut(key)?;
        entry.touch();
        let value = entry.value.clone();
        self.order.touch(key);
        Some(value)
    }

    // == Contains ==
    /// Like `get`, but leaves hit count and recency untouched.
    ///
    /// Still removes the entry if it turns out to be expired.
    pub fn contains(&mut self, key: &str) -> bool {
        if self.discard_if_expired(key) {
            return false;
        }
        self.entries.contains_key(key)
    }

    // == Remove ==
    /// Removes an entry, returning whether it was present.
    pub fn remove(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.order.forget(key);
        }
        removed
    }

    // == Invalidate ==
    /// Removes entries in bulk, returning how many were dropped.
    ///
    /// Without a pattern, the whole cache is cleared. With one, the pattern
    /// is compiled as a regular expression and every matching key is
    /// removed. An invalid pattern is logged and removes nothing.
    pub fn invalidate(&mut self, pattern: Option<&str>) -> usize {
        let Some(pattern) = pattern else {
            let removed = self.entries.len();
            self.entries.clear();
            self.order.clear();
            return removed;
        };

        let re = match Regex::new(pattern) {
            Ok(re) => re,
            Err(err) => {
                warn!(pattern, %err, "invalid invalidation pattern, nothing removed");
                return 0;
            }
        };

        let doomed: Vec<String> = self
            .entries
            .keys()
            .filter(|key| re.is_match(key))
            .cloned()
            .collect();
        for key in &doomed {
            self.entries.remove(key);
            self.order.forget(key);
        }
        doomed.len()
    }

    // == Stats ==
    /// Point-in-time report: size, capacity, approximate hit rate, lifetime
    /// counters, and one line per entry sorted by descending hit count.
    pub fn stats(&self) -> CacheReport {
        let items = self
            .entries
            .iter()
            .map(|(key, entry)| ItemReport {
                key: key.clone(),
                hit_count: entry.hit_count,
                age_ms: entry.age_ms(),
                ttl_remaining_ms: entry.ttl_remaining_ms(),
            })
            .collect();
        CacheReport::new(self.capacity, self.counters, items)
    }

    // == Clear Storage ==
    /// Deletes the persisted snapshot, if any. Best-effort.
    pub fn clear_storage(&self) {
        let Some(store) = &self.storage else {
            debug!("no snapshot store configured, clear skipped");
            return;
        };
        if let Err(err) = store.remove(SNAPSHOT_KEY) {
            warn!(%err, "failed to clear cache snapshot");
        }
    }

    // == Length ==
    /// Current number of entries, counting stale ones not yet discovered.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The TTL applied when `set` receives none.
    pub fn default_ttl_ms(&self) -> u64 {
        self.default_ttl_ms
    }

    // == Internals ==
    /// Removes `key` if it exists and has expired. Returns whether it did.
    fn discard_if_expired(&mut self, key: &str) -> bool {
        let expired = self
            .entries
            .get(key)
            .map(|entry| entry.is_expired())
            .unwrap_or(false);
        if expired {
            self.entries.remove(key);
            self.order.forget(key);
            self.counters.record_expiration();
        }
        expired
    }

    /// Drops every expired entry.
    fn sweep_expired(&mut self) {
        let dead: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();
        for key in dead {
            self.entries.remove(&key);
            self.order.forget(&key);
            self.counters.record_expiration();
        }
    }

    /// Evicts the least recently used entry. False only when empty.
    fn evict_lru(&mut self) -> bool {
        match self.order.pop_lru() {
            Some(victim) => {
                self.entries.remove(&victim);
                self.counters.record_eviction();
                debug!(key = %victim, "evicted least recently used entry");
                true
            }
            None => false,
        }
    }

    /// Capacity-enforcing insert shared by `set` and snapshot restore.
    fn insert_entry(&mut self, key: String, entry: CacheEntry<T>) {
        if !self.entries.contains_key(&key) {
            while self.entries.len() >= self.capacity {
                if !self.evict_lru() {
                    break;
                }
            }
        }
        self.entries.insert(key.clone(), entry);
        self.order.touch(&key);
    }
}

// == Snapshot Persistence ==
impl<T> TtlCache<T>
where
    T: Clone + Serialize + DeserializeOwned,
{
    /// Writes a snapshot of the selected (or all) fresh entries to the
    /// durable store, as one blob under a fixed key. Best-effort: failures
    /// are logged and the in-memory cache is left untouched.
    pub fn persist_to_storage(&self, keys: Option<&[String]>) {
        let Some(store) = &self.storage else {
            debug!("no snapshot store configured, persist skipped");
            return;
        };

        let records: BTreeMap<String, SnapshotRecord<T>> = self
            .entries
            .iter()
            .filter(|(key, entry)| {
                !entry.is_expired() && keys.map_or(true, |selection| selection.contains(*key))
            })
            .map(|(key, entry)| {
                (
                    key.clone(),
                    SnapshotRecord {
                        data: entry.value.clone(),
                        timestamp: entry.stored_at,
                        ttl: entry.ttl_ms,
                    },
                )
            })
            .collect();

        match snapshot::encode(&records) {
            Ok(blob) => {
                if let Err(err) = store.write(SNAPSHOT_KEY, &blob) {
                    warn!(%err, "failed to write cache snapshot");
                } else {
                    debug!(entries = records.len(), "cache snapshot persisted");
                }
            }
            Err(err) => warn!(%err, "failed to encode cache snapshot"),
        }
    }

    /// Re-hydrates entries from the persisted snapshot.
    ///
    /// Only entries whose TTL has not elapsed since their original store
    /// time are restored; each comes back with a zero hit count and a
    /// last-access time of now. The capacity bound is enforced during the
    /// restore. A missing, unreadable, or corrupt snapshot is logged and
    /// leaves the cache as it was.
    pub fn load_from_storage(&mut self) {
        let Some(store) = self.storage.clone() else {
            debug!("no snapshot store configured, load skipped");
            return;
        };

        let blob = match store.read(SNAPSHOT_KEY) {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                debug!("no cache snapshot present");
                return;
            }
            Err(err) => {
                warn!(%err, "failed to read cache snapshot");
                return;
            }
        };

        let records = match snapshot::decode::<T>(&blob) {
            Ok(records) => records,
            Err(err) => {
                warn!(%err, "corrupt cache snapshot ignored");
                return;
            }
        };

        let now = current_timestamp_ms();
        let mut restored = 0usize;
        for (key, record) in records {
            if now.saturating_sub(record.timestamp) >= record.ttl {
                continue;
            }
            self.insert_entry(
                key,
                CacheEntry::restored(record.data, record.timestamp, record.ttl),
            );
            restored += 1;
        }
        info!(restored, "cache snapshot loaded");
    }
}
