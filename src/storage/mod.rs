//! Storage Module
//!
//! The durable key-value boundary the cache persists snapshots through.
//! The cache reads and writes exactly one key ([`SNAPSHOT_KEY`]) holding
//! one JSON blob; anything else living in the same store is none of our
//! business, and concurrent external writers are tolerated: last writer
//! wins.

mod file;
mod memory;
pub mod snapshot;

pub use file::FileSnapshotStore;
pub use memory::MemorySnapshotStore;
pub use snapshot::SnapshotRecord;

use crate::error::StorageError;

// == Public Constants ==
/// Fixed key the snapshot blob is stored under.
pub const SNAPSHOT_KEY: &str = "snapcache.snapshot.v1";

// == Snapshot Store ==
/// A durable store of string blobs addressed by string keys.
///
/// Implementations must be safe to share across tasks. All methods are
/// synchronous; the cache calls them rarely (startup, shutdown, explicit
/// persist) and treats every error as a degraded no-op.
pub trait SnapshotStore: Send + Sync + std::fmt::Debug {
    /// Reads the blob under `key`, `None` if absent.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes `blob` under `key`, replacing any previous value.
    fn write(&self, key: &str, blob: &str) -> Result<(), StorageError>;

    /// Deletes the blob under `key`. Absent keys are not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
