//! Response DTOs for the cache service API
//!
//! Defines the structure of outgoing HTTP response bodies. The stats
//! endpoint serializes `cache::CacheReport` directly and needs no DTO here.

use serde::Serialize;

/// Response body for the GET operation (GET /get/:key)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value
    pub value: serde_json::Value,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for the SET operation (PUT /set)
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
}

impl SetResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
        }
    }
}

/// Response body for the HAS operation (GET /has/:key)
#[derive(Debug, Clone, Serialize)]
pub struct HasResponse {
    pub key: String,
    pub present: bool,
}

impl HasResponse {
    pub fn new(key: impl Into<String>, present: bool) -> Self {
        Self {
            key: key.into(),
            present,
        }
    }
}

/// Response body for the DELETE operation (DELETE /del/:key)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub key: String,
    /// Whether an entry was actually removed
    pub deleted: bool,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>, deleted: bool) -> Self {
        Self {
            key: key.into(),
            deleted,
        }
    }
}

/// Response body for bulk invalidation (POST /invalidate)
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    pub message: String,
    /// Number of entries removed
    pub removed: usize,
}

impl InvalidateResponse {
    pub fn new(removed: usize) -> Self {
        Self {
            message: format!("{removed} entries invalidated"),
            removed,
        }
    }
}

/// Response body for the snapshot operations
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotResponse {
    pub message: String,
}

impl SnapshotResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
