use std::time::Duration;

use url::Url;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

/// Configurable options for the offline worker
///
/// The worker never reads mutable globals; every deployment constant
/// (cache namespace, asset list, remote URLs) lives here and is passed
/// in at construction.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Name of the cache namespace for the current install generation
    pub cache_namespace: String,

    /// Origin the application is served from; precache asset paths are
    /// resolved against it
    pub origin: Url,

    /// Critical asset paths pre-cached on install
    pub precache_assets: Vec<String>,

    /// Remote manifest URL, matched exactly
    pub manifest_url: Url,

    /// Host serving feed documents
    pub feed_host: String,

    /// Path marker identifying feed requests on the feed host
    pub feed_path_marker: String,

    /// Byte capacity of the in-memory cache store
    pub max_cache_bytes: u64,

    /// Overall timeout for one HTTP request
    pub timeout: Duration,

    /// Connection timeout (time to establish initial connection)
    pub connect_timeout: Duration,

    /// Whether to follow redirects
    pub follow_redirects: bool,

    /// User agent string
    pub user_agent: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        let origin = Url::parse("https://reader.example.com/").expect("default origin is a valid URL");
        let manifest_url = origin
            .join("manifest.json")
            .expect("default manifest path joins against the origin");

        Self {
            cache_namespace: "feed-reader-cache-v1".to_owned(),
            origin,
            precache_assets: vec![
                "/".to_owned(),
                "/index.html".to_owned(),
                "/styles/main.css".to_owned(),
                "/scripts/app.js".to_owned(),
                "/manifest.json".to_owned(),
            ],
            manifest_url,
            feed_host: "feeds.reader.example.com".to_owned(),
            feed_path_marker: "rss".to_owned(),
            max_cache_bytes: 30 * 1024 * 1024, // 30MB
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            follow_redirects: true,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl WorkerConfig {
    pub fn builder() -> crate::builder::WorkerConfigBuilder {
        crate::builder::WorkerConfigBuilder::new()
    }
}
