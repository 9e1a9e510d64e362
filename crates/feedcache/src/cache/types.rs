//! # Cache Types
//!
//! This module defines common types used across the caching system.

use bytes::Bytes;

use crate::http::{Method, Request, Response};

/// Cache key identifying one stored response: request method plus URL
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Request method
    pub method: Method,
    /// Request URL
    pub url: String,
}

impl CacheKey {
    /// Create a new cache key
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
        }
    }

    /// Key identifying the given request
    pub fn for_request(request: &Request) -> Self {
        Self::new(request.method, request.url.as_str())
    }
}

/// One stored response snapshot
///
/// Entries never expire; a successful revalidation overwrites them in
/// place. Only status-200 GET responses are ever stored.
#[derive(Debug, Clone)]
pub struct CachedEntry {
    /// HTTP status code of the snapshot
    pub status: u16,
    /// Content type, if the response carried one
    pub content_type: Option<String>,
    /// Response body bytes
    pub body: Bytes,
    /// Unix timestamp (seconds) at which the entry was written
    pub stored_at: u64,
}

impl CachedEntry {
    /// Snapshot a response for storage
    pub fn from_response(response: &Response) -> Self {
        Self {
            status: response.status,
            content_type: response.content_type.clone(),
            body: response.body.clone(),
            stored_at: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
        }
    }

    /// Rehydrate the snapshot into a response for the given URL
    pub fn to_response(&self, url: &str) -> Response {
        let mut response = Response::new(self.status, self.body.clone()).with_url(url);
        if let Some(content_type) = &self.content_type {
            response = response.with_content_type(content_type.clone());
        }
        response
    }

    /// Weight of the entry in bytes, for size-based eviction
    pub fn weight(&self) -> u64 {
        self.body.len() as u64
    }
}

/// Result of a cache operation
pub type CacheResult<T> = std::result::Result<T, std::io::Error>;

/// Result of a cache lookup operation
pub type CacheLookupResult = CacheResult<Option<CachedEntry>>;

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    #[test]
    fn test_key_for_request_includes_method() {
        let url = Url::parse("https://reader.example/feed").unwrap();
        let get = CacheKey::for_request(&Request::get(url.clone()));
        let post = CacheKey::for_request(&Request::new(Method::Post, url));
        assert_ne!(get, post);
        assert_eq!(get.url, post.url);
    }

    #[test]
    fn test_round_trip_preserves_body_and_content_type() {
        let response = Response::new(200, "payload")
            .with_content_type("application/rss+xml")
            .with_url("https://feeds.example/rss/news");
        let entry = CachedEntry::from_response(&response);
        assert_eq!(entry.weight(), 7);

        let rehydrated = entry.to_response("https://feeds.example/rss/news");
        assert_eq!(rehydrated.status, 200);
        assert_eq!(rehydrated.body, response.body);
        assert_eq!(
            rehydrated.content_type.as_deref(),
            Some("application/rss+xml")
        );
    }
}
