//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::path::PathBuf;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// Default TTL in milliseconds for entries without explicit TTL
    pub default_ttl_ms: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Directory the snapshot file is kept in
    pub snapshot_dir: PathBuf,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 300000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SNAPSHOT_DIR` - Snapshot directory (default: ./snapcache-data)
    pub fn from_env() -> Self {
        Self {
            capacity: env::var("CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            default_ttl_ms: env::var("DEFAULT_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300_000),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            snapshot_dir: env::var("SNAPSHOT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./snapcache-data")),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 1000,
            default_ttl_ms: 300_000,
            server_port: 3000,
            snapshot_dir: PathBuf::from("./snapcache-data"),
        }
    }
}
