//! # Memory Cache Store
//!
//! In-memory cache store implementation using Moka caching, with one Moka
//! cache per namespace and size-based eviction on body length.

use std::collections::HashMap;

use moka::future::Cache as MokaCache;
use parking_lot::RwLock;
use tracing::debug;

use crate::cache::store::CacheStore;
use crate::cache::types::{CacheKey, CacheLookupResult, CacheResult, CachedEntry};

type Namespace = MokaCache<CacheKey, CachedEntry>;

/// Memory cache store implementation using Moka
pub struct MemoryCacheStore {
    /// Namespaces by name; entries live in per-namespace Moka caches
    namespaces: RwLock<HashMap<String, Namespace>>,
    /// Maximum size per namespace in bytes
    max_bytes: u64,
}

impl MemoryCacheStore {
    /// Create a new memory cache store with the specified per-namespace
    /// size limit
    ///
    /// # Panics
    ///
    /// Panics if `max_bytes` is zero.
    pub fn new(max_bytes: u64) -> Self {
        if max_bytes == 0 {
            panic!("Cache store size must be greater than zero");
        }

        Self {
            namespaces: RwLock::new(HashMap::new()),
            max_bytes,
        }
    }

    /// Fetch the namespace cache handle, if the namespace exists
    fn namespace(&self, name: &str) -> Option<Namespace> {
        self.namespaces.read().get(name).cloned()
    }

    /// Fetch or create the namespace cache handle
    fn namespace_or_create(&self, name: &str) -> Namespace {
        if let Some(cache) = self.namespace(name) {
            return cache;
        }

        let mut namespaces = self.namespaces.write();
        namespaces
            .entry(name.to_owned())
            .or_insert_with(|| {
                debug!(namespace = name, max_bytes = self.max_bytes, "created cache namespace");
                // Size based eviction on body length
                MokaCache::builder()
                    .weigher(|_k, v: &CachedEntry| v.weight().try_into().unwrap_or(u32::MAX))
                    .max_capacity(self.max_bytes)
                    .build()
            })
            .clone()
    }
}

#[async_trait::async_trait]
impl CacheStore for MemoryCacheStore {
    async fn namespaces(&self) -> CacheResult<Vec<String>> {
        Ok(self.namespaces.read().keys().cloned().collect())
    }

    async fn delete_namespace(&self, name: &str) -> CacheResult<bool> {
        let removed = self.namespaces.write().remove(name).is_some();
        if removed {
            debug!(namespace = name, "deleted cache namespace");
        }
        Ok(removed)
    }

    async fn contains(&self, namespace: &str, key: &CacheKey) -> CacheResult<bool> {
        Ok(self
            .namespace(namespace)
            .map(|cache| cache.contains_key(key))
            .unwrap_or(false))
    }

    async fn lookup(&self, namespace: &str, key: &CacheKey) -> CacheLookupResult {
        let Some(cache) = self.namespace(namespace) else {
            return Ok(None);
        };
        Ok(cache.get(key).await)
    }

    async fn put(&self, namespace: &str, key: CacheKey, entry: CachedEntry) -> CacheResult<()> {
        let cache = self.namespace_or_create(namespace);
        cache.insert(key, entry).await;
        Ok(())
    }

    async fn remove(&self, namespace: &str, key: &CacheKey) -> CacheResult<()> {
        if let Some(cache) = self.namespace(namespace) {
            cache.invalidate(key).await;
        }
        Ok(())
    }
}
