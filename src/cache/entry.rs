//! Cache Entry Module
//!
//! Defines a single cache entry carrying its value, TTL, and access metadata.

use std::time::{SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// A stored value together with the metadata that drives expiration,
/// eviction, and statistics.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The stored value
    pub value: T,
    /// Insertion / refresh timestamp (Unix milliseconds)
    pub stored_at: u64,
    /// Time-to-live in milliseconds, counted from `stored_at`
    pub ttl_ms: u64,
    /// Number of successful reads since insertion or restore
    pub hit_count: u64,
    /// Timestamp of the most recent read (Unix milliseconds)
    pub last_accessed_at: u64,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates a fresh entry stored now, with zeroed access statistics.
    pub fn new(value: T, ttl_ms: u64) -> Self {
        let now = current_timestamp_ms();
        Self {
            value,
            stored_at: now,
            ttl_ms,
            hit_count: 0,
            last_accessed_at: now,
        }
    }

    /// Rebuilds an entry from a persisted snapshot record.
    ///
    /// `stored_at` is kept from the original insertion so the TTL keeps
    /// counting from the original store time, while the access statistics
    /// start over (`hit_count = 0`, `last_accessed_at = now`).
    pub fn restored(value: T, stored_at: u64, ttl_ms: u64) -> Self {
        Self {
            value,
            stored_at,
            ttl_ms,
            hit_count: 0,
            last_accessed_at: current_timestamp_ms(),
        }
    }

    // == Is Expired ==
    /// Checks whether the TTL has elapsed.
    ///
    /// An entry is fresh while `now - stored_at < ttl_ms`; once the full
    /// TTL duration has passed it is expired and must be treated as absent.
    pub fn is_expired(&self) -> bool {
        current_timestamp_ms().saturating_sub(self.stored_at) >= self.ttl_ms
    }

    // == Touch ==
    /// Records a successful read: bumps the hit counter and refreshes the
    /// last-access timestamp.
    pub fn touch(&mut self) {
        self.hit_count += 1;
        self.last_accessed_at = current_timestamp_ms();
    }

    /// Age of the entry in milliseconds.
    pub fn age_ms(&self) -> u64 {
        current_timestamp_ms().saturating_sub(self.stored_at)
    }

    /// Remaining TTL in milliseconds, zero once expired.
    pub fn ttl_remaining_ms(&self) -> u64 {
        self.ttl_ms.saturating_sub(self.age_ms())
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
///
/// Wall-clock time rather than a monotonic instant: timestamps are written
/// into snapshots and must stay meaningful across process restarts.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_entry_new_is_fresh() {
        let entry = CacheEntry::new("payload".to_string(), 5_000);

        assert_eq!(entry.value, "payload");
        assert_eq!(entry.hit_count, 0);
        assert!(!entry.is_expired());
        assert_eq!(entry.stored_at, entry.last_accessed_at);
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let entry = CacheEntry::new(1u32, 50);

        assert!(!entry.is_expired());
        sleep(Duration::from_millis(80));
        assert!(entry.is_expired());
    }

    #[test]
    fn test_entry_touch_updates_stats() {
        let mut entry = CacheEntry::new(1u32, 5_000);
        let before = entry.last_accessed_at;

        sleep(Duration::from_millis(5));
        entry.touch();
        entry.touch();

        assert_eq!(entry.hit_count, 2);
        assert!(entry.last_accessed_at >= before);
    }

    #[test]
    fn test_entry_ttl_remaining() {
        let entry = CacheEntry::new(1u32, 10_000);

        let remaining = entry.ttl_remaining_ms();
        assert!(remaining <= 10_000);
        assert!(remaining >= 9_000);
    }

    #[test]
    fn test_entry_ttl_remaining_expired_is_zero() {
        let entry = CacheEntry::new(1u32, 30);
        sleep(Duration::from_millis(60));

        assert_eq!(entry.ttl_remaining_ms(), 0);
    }

    #[test]
    fn test_restored_keeps_stored_at() {
        let past = current_timestamp_ms() - 1_000;
        let entry = CacheEntry::restored("v".to_string(), past, 10_000);

        assert_eq!(entry.stored_at, past);
        assert_eq!(entry.hit_count, 0);
        assert!(entry.last_accessed_at > past);
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_expiration_boundary() {
        let now = current_timestamp_ms();
        let entry = CacheEntry {
            value: "v",
            stored_at: now.saturating_sub(100),
            ttl_ms: 100,
            hit_count: 0,
            last_accessed_at: now,
        };

        // now - stored_at == ttl_ms: the full TTL has elapsed
        assert!(entry.is_expired());
    }
}
