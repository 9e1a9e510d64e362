//! # Cache System
//!
//! Namespaced storage of request→response snapshots. A namespace
//! corresponds to one install generation of the worker; stale namespaces
//! are purged during activation.

// Module declarations
mod memory;
mod store;
mod types;

// Re-export primary types from our various modules
pub use memory::MemoryCacheStore;
pub use store::CacheStore;
pub use types::{CacheKey, CacheLookupResult, CacheResult, CachedEntry};
