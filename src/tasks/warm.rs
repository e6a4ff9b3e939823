//! Preload and warmup helpers.
//!
//! Both take the cache behind `Arc<RwLock<..>>`, invoke caller-supplied
//! async loaders for keys that are not already cached, and store whatever
//! the loaders produce under the default TTL. Loader failures are logged
//! per key and never fail the batch; callers get back a future that
//! resolves once every scheduled load has settled. There is no
//! cancellation: a load that resolves after a concurrent clear simply
//! writes into the colder cache.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::cache::TtlCache;

// == Public Constants ==
/// Batch size used by `warmup` callers that have no reason to pick one.
pub const DEFAULT_WARMUP_BATCH: usize = 3;

// == Loader Types ==
/// Boxed future produced by a warmup loader.
pub type LoaderFuture<T> = Pin<Box<dyn Future<Output = anyhow::Result<T>> + Send>>;

/// Boxed one-shot loader for a warmup entry.
pub type BoxLoader<T> = Box<dyn FnOnce() -> LoaderFuture<T> + Send>;

// == Warmup Entry ==
/// One entry to warm: a key, the loader that produces its value, and a
/// priority (higher loads earlier).
pub struct WarmupEntry<T> {
    pub key: String,
    pub priority: i32,
    pub loader: BoxLoader<T>,
}

impl<T> WarmupEntry<T> {
    pub fn new<F, Fut>(key: impl Into<String>, priority: i32, loader: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        Self {
            key: key.into(),
            priority,
            loader: Box::new(move || Box::pin(loader()) as LoaderFuture<T>),
        }
    }
}

// == Preload ==
/// Loads every key not already cached, all loaders in flight at once.
///
/// Each successful load is stored under the cache's default TTL. A loader
/// error or panic costs only its own key.
pub async fn preload<T, F, Fut>(cache: Arc<RwLock<TtlCache<T>>>, keys: Vec<String>, loader: F)
where
    T: Clone + Send + Sync + 'static,
    F: Fn(String) -> Fut,
    Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
{
    let missing: Vec<String> = {
        let mut cache = cache.write().await;
        keys.into_iter().filter(|key| !cache.contains(key)).collect()
    };
    if missing.is_empty() {
        debug!("preload: every key already cached");
        return;
    }

    let mut tasks = JoinSet::new();
    for key in missing {
        let fut = loader(key.clone());
        tasks.spawn(async move { (key, fut.await) });
    }
    drain(&cache, tasks, "preload").await;
}

// == Warmup ==
/// Loads prioritized entries in batches of at most `batch_size`.
///
/// Entries are sorted by descending priority (equal priorities keep their
/// given order); a batch is fully settled before the next one starts, so
/// no more than `batch_size` loaders are ever in flight. Keys already
/// cached when their batch starts are skipped without invoking the loader.
pub async fn warmup<T>(
    cache: Arc<RwLock<TtlCache<T>>>,
    mut entries: Vec<WarmupEntry<T>>,
    batch_size: usize,
) where
    T: Clone + Send + Sync + 'static,
{
    let batch_size = batch_size.max(1);
    entries.sort_by(|a, b| b.priority.cmp(&a.priority));

    while !entries.is_empty() {
        let tail = entries.split_off(batch_size.min(entries.len()));
        let batch = std::mem::replace(&mut entries, tail);

        let mut tasks = JoinSet::new();
        {
            let mut cache = cache.write().await;
            for entry in batch {
                if cache.contains(&entry.key) {
                    debug!(key = %entry.key, "warmup: already cached, skipping");
                    continue;
                }
                let fut = (entry.loader)();
                let key = entry.key;
                tasks.spawn(async move { (key, fut.await) });
            }
        }
        drain(&cache, tasks, "warmup").await;
    }
}

/// Awaits every task in the set, storing successes and logging failures.
async fn drain<T>(
    cache: &Arc<RwLock<TtlCache<T>>>,
    mut tasks: JoinSet<(String, anyhow::Result<T>)>,
    what: &str,
) where
    T: Clone + Send + Sync + 'static,
{
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((key, Ok(value))) => {
                cache.write().await.set(key, value, None);
            }
            Ok((key, Err(err))) => warn!(key = %key, %err, "{what} loader failed"),
            Err(err) => warn!(%err, "{what} task aborted"),
        }
    }
}
