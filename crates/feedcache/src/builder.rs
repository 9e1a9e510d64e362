//! # Builder for WorkerConfig
//!
//! This module provides a builder pattern implementation for creating and
//! customizing WorkerConfig instances with a fluent API.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use feedcache_engine::WorkerConfig;
//!
//! let config = WorkerConfig::builder()
//!     .with_cache_namespace("reader-cache-v3")
//!     .with_feed_host("feeds.example.com")
//!     .with_feed_path_marker("rss")
//!     .with_timeout(Duration::from_secs(60))
//!     .with_precache_asset("/offline.html")
//!     .build();
//!
//! assert_eq!(config.cache_namespace, "reader-cache-v3");
//! ```

use std::time::Duration;

use url::Url;

use crate::WorkerConfig;

/// Builder for creating WorkerConfig instances with a fluent API
#[derive(Debug, Clone)]
pub struct WorkerConfigBuilder {
    /// Internal config being built
    config: WorkerConfig,
}

impl WorkerConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: WorkerConfig::default(),
        }
    }

    /// Set the cache namespace for the current install generation
    pub fn with_cache_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.config.cache_namespace = namespace.into();
        self
    }

    /// Set the application origin
    pub fn with_origin(mut self, origin: Url) -> Self {
        self.config.origin = origin;
        self
    }

    /// Replace the precache asset list
    pub fn with_precache_assets(mut self, assets: Vec<String>) -> Self {
        self.config.precache_assets = assets;
        self
    }

    /// Append one asset path to the precache list
    pub fn with_precache_asset(mut self, asset: impl Into<String>) -> Self {
        self.config.precache_assets.push(asset.into());
        self
    }

    /// Set the remote manifest URL
    pub fn with_manifest_url(mut self, url: Url) -> Self {
        self.config.manifest_url = url;
        self
    }

    /// Set the feed host
    pub fn with_feed_host(mut self, host: impl Into<String>) -> Self {
        self.config.feed_host = host.into();
        self
    }

    /// Set the feed path marker
    pub fn with_feed_path_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.feed_path_marker = marker.into();
        self
    }

    /// Set the byte capacity of the cache store
    pub fn with_max_cache_bytes(mut self, bytes: u64) -> Self {
        self.config.max_cache_bytes = bytes;
        self
    }

    /// Set the overall timeout for one HTTP request
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set whether to follow redirects
    pub fn with_follow_redirects(mut self, follow: bool) -> Self {
        self.config.follow_redirects = follow;
        self
    }

    /// Set the user agent string
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Build the final configuration
    pub fn build(self) -> WorkerConfig {
        self.config
    }
}

impl Default for WorkerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides_defaults() {
        let config = WorkerConfigBuilder::new()
            .with_cache_namespace("cache-v9")
            .with_feed_host("rss.example.org")
            .with_max_cache_bytes(1024)
            .with_follow_redirects(false)
            .build();

        assert_eq!(config.cache_namespace, "cache-v9");
        assert_eq!(config.feed_host, "rss.example.org");
        assert_eq!(config.max_cache_bytes, 1024);
        assert!(!config.follow_redirects);
    }

    #[test]
    fn test_builder_appends_assets() {
        let base_len = WorkerConfig::default().precache_assets.len();
        let config = WorkerConfigBuilder::new()
            .with_precache_asset("/offline.html")
            .build();
        assert_eq!(config.precache_assets.len(), base_len + 1);
        assert_eq!(config.precache_assets.last().unwrap(), "/offline.html");
    }
}
