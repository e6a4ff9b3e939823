//! Cache Warming Module
//!
//! Async helpers that fill the cache from caller-supplied loaders.
//!
//! # Helpers
//! - `preload`: load a set of missing keys concurrently through one loader
//! - `warmup`: load prioritized entries in bounded concurrent batches

mod warm;

pub use warm::{preload, warmup, BoxLoader, LoaderFuture, WarmupEntry, DEFAULT_WARMUP_BATCH};
