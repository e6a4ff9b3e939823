//! In-memory snapshot store, for tests and ephemeral deployments.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::StorageError;
use crate::storage::SnapshotStore;

// == Memory Snapshot Store ==
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned lock only means another thread panicked mid-write; the
    // map itself is still usable, so recover it instead of propagating.
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.blobs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().get(key).cloned())
    }

    fn write(&self, key: &str, blob: &str) -> Result<(), StorageError> {
        self.lock().insert(key.to_string(), blob.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock().remove(key);
        Ok(())
    }
}
