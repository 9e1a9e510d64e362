//! # HTTP Model
//!
//! Transport-neutral request and response types used by the worker. The
//! fetcher turns these into real network traffic; the strategies and cache
//! only ever see these snapshots.

use bytes::Bytes;
use url::Url;

/// HTTP request method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl Method {
    /// Convert to the wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }

    /// Whether this method has GET caching semantics
    pub fn is_get(&self) -> bool {
        matches!(self, Self::Get)
    }
}

/// An intercepted request
#[derive(Debug, Clone)]
pub struct Request {
    /// Request URL
    pub url: Url,
    /// HTTP method
    pub method: Method,
    /// Request body, if any
    pub body: Option<Bytes>,
}

impl Request {
    /// Create a new request
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            url,
            method,
            body: None,
        }
    }

    /// Create a GET request
    pub fn get(url: Url) -> Self {
        Self::new(Method::Get, url)
    }

    /// Attach a body to the request
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// A response snapshot handed back to the requester
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Content-Type header value, if present
    pub content_type: Option<String>,
    /// Response body
    pub body: Bytes,
    /// URL the response was produced for
    pub url: String,
}

impl Response {
    /// Create a new response
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            content_type: None,
            body: body.into(),
            url: String::new(),
        }
    }

    /// Set the content type
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Set the response URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Synthetic 503 returned when both network and cache are unavailable
    pub fn unavailable(body: &str) -> Self {
        Self::new(503, body.to_owned()).with_content_type("text/plain")
    }

    /// Standard reason phrase for the status code
    pub fn status_text(&self) -> &'static str {
        status_text_for(self.status)
    }
}

fn status_text_for(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        304 => "Not Modified",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "Unknown",
    }
}
