//! # Feedcache Engine
//!
//! An offline-first request interception and caching engine for feed
//! reader applications. Intercepted requests are classified (feed,
//! manifest, or generic) and served by a stale-while-revalidate strategy
//! backed by a namespaced cache store, with background refreshes and
//! update broadcasts to connected application instances.
//!
//! ## Features
//!
//! - Explicit lifecycle: install (asset pre-cache), activate (stale
//!   namespace purge + client claim), fetch, message, sync
//! - Stale-while-revalidate with detached background refreshes
//! - Version-aware manifest caching with dotted-integer comparison
//! - Collaborators behind traits, so the core runs without a browser host
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use feedcache_engine::{
//!     ClientHub, HttpFetcher, MemoryCacheStore, OfflineWorker, WorkerConfig,
//! };
//!
//! let config = WorkerConfig::builder()
//!     .with_cache_namespace("reader-cache-v2")
//!     .build();
//!
//! let store = Arc::new(MemoryCacheStore::new(config.max_cache_bytes));
//! let fetcher = Arc::new(HttpFetcher::new(&config).unwrap());
//! let hub = Arc::new(ClientHub::new());
//!
//! let worker = OfflineWorker::new(config, store, fetcher, hub);
//! assert!(!worker.state().can_intercept());
//! ```

pub mod builder;
pub mod cache;
pub mod clients;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod http;
pub mod manifest;
pub mod strategy;
pub mod version;
pub mod worker;

#[cfg(test)]
pub(crate) mod test_support;

pub use builder::WorkerConfigBuilder;
pub use cache::{CacheKey, CacheLookupResult, CacheResult, CacheStore, CachedEntry, MemoryCacheStore};
pub use clients::{ClientHub, ClientId, ClientMessage, ClientNotifier, WorkerMessage};
pub use config::WorkerConfig;
pub use error::WorkerError;
pub use fetcher::{Fetcher, HttpFetcher, create_client};
pub use http::{Method, Request, Response};
pub use manifest::{ManifestRecord, parse_version_or_none};
pub use strategy::{RequestClass, RevalidationEvent, RevalidationOutcome, StrategyEngine, classify};
pub use version::is_newer_version;
pub use worker::{OfflineWorker, SYNC_FEEDS_TAG, WorkerState};
