//! Snapcache - a bounded in-memory TTL cache with LRU eviction
//!
//! Provides per-entry expiration, least-recently-used eviction at capacity,
//! best-effort snapshot persistence, async cache warming, and an HTTP
//! surface exposing the cache operations.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod tasks;

pub use api::{AppState, SharedCache};
pub use cache::TtlCache;
pub use config::Config;
