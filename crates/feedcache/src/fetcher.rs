//! # Network Fetcher
//!
//! The fetcher collaborator performs the actual HTTP retrieval for the
//! worker. `HttpFetcher` is the reqwest-backed implementation; tests swap
//! in their own.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use crate::WorkerError;
use crate::config::WorkerConfig;
use crate::http::{Method, Request, Response};

/// A collaborator able to retrieve a request over the network
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Perform the retrieval, returning a full response snapshot
    async fn fetch(&self, request: &Request) -> Result<Response, WorkerError>;
}

/// Create a reqwest Client with the provided configuration
pub fn create_client(config: &WorkerConfig) -> Result<Client, WorkerError> {
    let mut client_builder = Client::builder()
        .user_agent(&config.user_agent)
        .default_headers(default_headers())
        .redirect(if config.follow_redirects {
            reqwest::redirect::Policy::limited(10)
        } else {
            reqwest::redirect::Policy::none()
        });

    if !config.timeout.is_zero() {
        client_builder = client_builder.timeout(config.timeout);
    }

    if !config.connect_timeout.is_zero() {
        client_builder = client_builder.connect_timeout(config.connect_timeout);
    }

    client_builder.build().map_err(WorkerError::from)
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();

    headers.insert(
        reqwest::header::ACCEPT,
        HeaderValue::from_static(
            "application/rss+xml,application/xml;q=0.9,application/json;q=0.8,*/*;q=0.5",
        ),
    );

    headers.insert(
        reqwest::header::ACCEPT_ENCODING,
        HeaderValue::from_static("gzip, deflate"),
    );

    headers
}

/// Network fetcher backed by a reqwest Client
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher configured from the worker configuration
    pub fn new(config: &WorkerConfig) -> Result<Self, WorkerError> {
        Ok(Self {
            client: create_client(config)?,
        })
    }

}

fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
        Method::Patch => reqwest::Method::PATCH,
        Method::Head => reqwest::Method::HEAD,
        Method::Options => reqwest::Method::OPTIONS,
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response, WorkerError> {
        let mut builder = self
            .client
            .request(reqwest_method(request.method), request.url.clone());

        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_owned());
        let url = response.url().to_string();
        let body = response.bytes().await?;

        debug!(%url, status, bytes = body.len(), "network fetch completed");

        Ok(Response {
            status,
            content_type,
            body,
            url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client_with_defaults() {
        let config = WorkerConfig::default();
        assert!(create_client(&config).is_ok());
    }

    #[test]
    fn test_create_client_without_redirects() {
        let config = WorkerConfig::builder().with_follow_redirects(false).build();
        assert!(create_client(&config).is_ok());
    }
}
