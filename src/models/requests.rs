//! Request DTOs for the cache service API
//!
//! Defines the structure of incoming HTTP request bodies.

use regex::Regex;
use serde::Deserialize;

use crate::cache::MAX_KEY_LENGTH;

/// Request body for the SET operation (PUT /set)
///
/// # Fields
/// - `key`: The cache key to store the value under
/// - `value`: The value to store, arbitrary JSON
/// - `ttl_ms`: Optional TTL in milliseconds (uses default if not specified)
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// The value to store
    pub value: serde_json::Value,
    /// Optional TTL in milliseconds
    #[serde(default)]
    pub ttl_ms: Option<u64>,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        if self.key.len() > MAX_KEY_LENGTH {
            return Some(format!(
                "Key exceeds maximum length of {MAX_KEY_LENGTH} characters"
            ));
        }
        None
    }
}

/// Request body for bulk invalidation (POST /invalidate)
///
/// Without a pattern the whole cache is cleared; with one, every key
/// matching the regular expression is removed.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct InvalidateRequest {
    #[serde(default)]
    pub pattern: Option<String>,
}

impl InvalidateRequest {
    /// Returns an error message if the pattern is not a valid regex.
    pub fn validate(&self) -> Option<String> {
        match &self.pattern {
            Some(pattern) => Regex::new(pattern)
                .err()
                .map(|err| format!("Invalid pattern: {err}")),
            None => None,
        }
    }
}

/// Request body for snapshot persistence (POST /snapshot/persist)
///
/// `keys` narrows the snapshot to a selection; absent means everything.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PersistRequest {
    #[serde(default)]
    pub keys: Option<Vec<String>>,
}
