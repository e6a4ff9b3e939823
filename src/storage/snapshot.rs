//! Snapshot blob codec.
//!
//! A snapshot is one JSON object mapping cached key to
//! `{data, timestamp, ttl}`. That is the whole schema; hit counts and
//! access times are deliberately not persisted, restored entries start
//! with fresh statistics.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::StorageError;

// == Snapshot Record ==
/// One persisted entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotRecord<T> {
    /// The cached value
    pub data: T,
    /// Original insertion time of the entry (Unix milliseconds)
    pub timestamp: u64,
    /// TTL in milliseconds, counted from `timestamp`
    pub ttl: u64,
}

/// Encodes records to the snapshot blob.
///
/// A `BTreeMap` keeps the blob byte-stable for identical contents, which
/// keeps diffs and tests readable.
pub fn encode<T: Serialize>(
    records: &BTreeMap<String, SnapshotRecord<T>>,
) -> Result<String, StorageError> {
    Ok(serde_json::to_string(records)?)
}

/// Decodes a snapshot blob back into records.
pub fn decode<T: DeserializeOwned>(
    blob: &str,
) -> Result<BTreeMap<String, SnapshotRecord<T>>, StorageError> {
    Ok(serde_json::from_str(blob)?)
}
