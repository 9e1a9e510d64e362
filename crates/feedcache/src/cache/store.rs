//! # Cache Store
//!
//! This module defines the cache store trait that all cache implementations
//! must follow.

use async_trait::async_trait;

use crate::cache::types::{CacheKey, CacheLookupResult, CacheResult, CachedEntry};

/// A namespaced store of request→response snapshots
///
/// Puts on the same key are last-writer-wins; the store provides no
/// transactional guarantee across concurrent writers.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Enumerate all namespace names currently present
    async fn namespaces(&self) -> CacheResult<Vec<String>>;

    /// Delete a whole namespace; returns whether it existed
    async fn delete_namespace(&self, name: &str) -> CacheResult<bool>;

    /// Check if the namespace contains an entry for the given key
    async fn contains(&self, namespace: &str, key: &CacheKey) -> CacheResult<bool>;

    /// Get an entry from the cache
    async fn lookup(&self, namespace: &str, key: &CacheKey) -> CacheLookupResult;

    /// Put an entry into the cache, creating the namespace if needed
    async fn put(&self, namespace: &str, key: CacheKey, entry: CachedEntry) -> CacheResult<()>;

    /// Remove an entry from the cache
    async fn remove(&self, namespace: &str, key: &CacheKey) -> CacheResult<()>;
}
