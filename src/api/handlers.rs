//! API Handlers
//!
//! HTTP request handlers for each cache service endpoint.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::{CacheReport, TtlCache};
use crate::error::{CacheError, Result};
use crate::models::{
    DeleteResponse, GetResponse, HasResponse, HealthResponse, InvalidateRequest,
    InvalidateResponse, PersistRequest, SetRequest, SetResponse, SnapshotResponse,
};
use crate::storage::FileSnapshotStore;

/// The cache as the handlers share it: JSON payloads behind a lock.
pub type SharedCache = Arc<RwLock<TtlCache<serde_json::Value>>>;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe cache
    pub cache: SharedCache,
}

impl AppState {
    /// Creates a new AppState with the given cache.
    pub fn new(cache: TtlCache<serde_json::Value>) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// The cache is wired to a file-backed snapshot store under the
    /// configured snapshot directory.
    pub fn from_config(config: &crate::config::Config) -> Self {
        let storage = Arc::new(FileSnapshotStore::new(&config.snapshot_dir));
        let cache = TtlCache::new(config.capacity, config.default_ttl_ms).with_storage(storage);
        Self::new(cache)
    }
}

/// Handler for PUT /set
///
/// Stores a key-value pair in the cache with optional TTL.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let mut cache = state.cache.write().await;
    cache.set(req.key.clone(), req.value, req.ttl_ms);

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
///
/// Retrieves a value from the cache by key. Expired entries read as absent.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    // Write lock: a hit touches access statistics, a stale entry is removed
    let mut cache = state.cache.write().await;
    match cache.get(&key) {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for GET /has/:key
///
/// Reports presence without counting a hit.
pub async fn has_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<HasResponse> {
    let mut cache = state.cache.write().await;
    let present = cache.contains(&key);
    Json(HasResponse::new(key, present))
}

/// Handler for DELETE /del/:key
///
/// Removes a key from the cache; reports whether anything was there.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<DeleteResponse> {
    let mut cache = state.cache.write().await;
    let deleted = cache.remove(&key);
    Json(DeleteResponse::new(key, deleted))
}

/// Handler for POST /invalidate
///
/// Clears the cache, or with a pattern removes every matching key.
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Json(req): Json<InvalidateRequest>,
) -> Result<Json<InvalidateResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let mut cache = state.cache.write().await;
    let removed = cache.invalidate(req.pattern.as_deref());
    Ok(Json(InvalidateResponse::new(removed)))
}

/// Handler for GET /stats
///
/// Returns the cache report: size, capacity, approximate hit rate,
/// lifetime counters, and per-entry lines.
pub async fn stats_handler(State(state): State<AppState>) -> Json<CacheReport> {
    let cache = state.cache.read().await;
    Json(cache.stats())
}

/// Handler for POST /snapshot/persist
///
/// Writes a snapshot of the selected (or all) entries. Best-effort:
/// storage faults are logged, the response is always a success.
pub async fn persist_handler(
    State(state): State<AppState>,
    Json(req): Json<PersistRequest>,
) -> Json<SnapshotResponse> {
    let cache = state.cache.read().await;
    cache.persist_to_storage(req.keys.as_deref());
    Json(SnapshotResponse::new("Snapshot persisted"))
}

/// Handler for POST /snapshot/load
///
/// Re-hydrates fresh entries from the persisted snapshot, if one exists.
pub async fn load_handler(State(state): State<AppState>) -> Json<SnapshotResponse> {
    let mut cache = state.cache.write().await;
    cache.load_from_storage();
    Json(SnapshotResponse::new("Snapshot loaded"))
}

/// Handler for DELETE /snapshot
///
/// Drops the persisted snapshot without touching in-memory entries.
pub async fn clear_snapshot_handler(State(state): State<AppState>) -> Json<SnapshotResponse> {
    let cache = state.cache.read().await;
    cache.clear_storage();
    Json(SnapshotResponse::new("Snapshot cleared"))
}

/// Handler for GET /health
///
/// Returns health status of the service.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
