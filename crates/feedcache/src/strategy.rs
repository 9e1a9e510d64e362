//! # Caching Strategies
//!
//! Request classification and the three caching strategies of the worker:
//! generic stale-while-revalidate, the feed variant with update broadcasts,
//! and the version-aware manifest variant.
//!
//! Revalidation runs as detached tasks, fire-and-forget relative to the
//! response already handed back to the requester. Concurrent puts on the
//! same key are last-writer-wins; entries are idempotent snapshots of a GET
//! response, so the race is accepted rather than coordinated away.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};
use url::Url;

use crate::cache::{CacheKey, CacheStore, CachedEntry};
use crate::clients::{ClientNotifier, WorkerMessage};
use crate::config::WorkerConfig;
use crate::fetcher::Fetcher;
use crate::http::{Request, Response};
use crate::manifest::parse_version_or_none;
use crate::version::is_newer_version;

/// Classification of an intercepted request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestClass {
    /// Feed document on the configured feed host
    Feed,
    /// The remote manifest URL, matched exactly
    Manifest,
    /// Everything else
    Generic,
}

/// Classify a request URL against the worker configuration
pub fn classify(config: &WorkerConfig, url: &Url) -> RequestClass {
    if url.host_str() == Some(config.feed_host.as_str())
        && url.path().contains(&config.feed_path_marker)
    {
        RequestClass::Feed
    } else if url == &config.manifest_url {
        RequestClass::Manifest
    } else {
        RequestClass::Generic
    }
}

/// How one background revalidation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevalidationOutcome {
    /// The cache entry was overwritten with a fresh response
    Refreshed,
    /// The fetch succeeded but the cache was left untouched
    Unchanged,
    /// The fetch failed; the cached entry stays as-is
    Failed,
}

/// Completion record of one detached revalidation task
#[derive(Debug, Clone)]
pub struct RevalidationEvent {
    /// URL that was revalidated
    pub url: String,
    /// How the task ended
    pub outcome: RevalidationOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StrategyKind {
    Generic,
    Feed,
}

impl StrategyKind {
    fn unavailable_body(self) -> &'static str {
        match self {
            Self::Generic => "Resource unavailable",
            Self::Feed => "Feed unavailable",
        }
    }
}

/// The strategy selector: classifies requests and runs the matching
/// caching strategy against the injected collaborators
pub struct StrategyEngine {
    config: Arc<WorkerConfig>,
    store: Arc<dyn CacheStore>,
    fetcher: Arc<dyn Fetcher>,
    notifier: Arc<dyn ClientNotifier>,
    revalidation_hook: Option<mpsc::UnboundedSender<RevalidationEvent>>,
}

impl StrategyEngine {
    /// Create an engine over the given collaborators
    pub fn new(
        config: Arc<WorkerConfig>,
        store: Arc<dyn CacheStore>,
        fetcher: Arc<dyn Fetcher>,
        notifier: Arc<dyn ClientNotifier>,
    ) -> Self {
        Self {
            config,
            store,
            fetcher,
            notifier,
            revalidation_hook: None,
        }
    }

    /// Observe detached revalidation tasks as they complete
    ///
    /// The hook changes nothing about the semantics; it exists so embedders
    /// (and tests) can join on background work without the engine growing
    /// cancellation or retry machinery.
    pub fn set_revalidation_hook(&mut self, hook: mpsc::UnboundedSender<RevalidationEvent>) {
        self.revalidation_hook = Some(hook);
    }

    /// Run the strategy selected for the request and produce a response
    ///
    /// Never fails: every error path collapses into a cached fallback or a
    /// synthetic 503.
    pub async fn handle(&self, request: Request) -> Response {
        if !request.method.is_get() {
            // Non-GET requests bypass the cache entirely
            return self.network_only(&request).await;
        }

        match classify(&self.config, &request.url) {
            RequestClass::Generic => {
                self.stale_while_revalidate(request, StrategyKind::Generic)
                    .await
            }
            RequestClass::Feed => self.stale_while_revalidate(request, StrategyKind::Feed).await,
            RequestClass::Manifest => self.manifest(request).await,
        }
    }

    /// Forward a request to the network without touching the cache
    pub(crate) async fn network_only(&self, request: &Request) -> Response {
        match self.fetcher.fetch(request).await {
            Ok(response) => response,
            Err(error) => {
                warn!(url = %request.url, %error, "pass-through fetch failed");
                Response::unavailable("Resource unavailable").with_url(request.url.as_str())
            }
        }
    }

    async fn stale_while_revalidate(&self, request: Request, kind: StrategyKind) -> Response {
        let key = CacheKey::for_request(&request);

        if let Some(entry) = self.cached_entry(&key).await {
            debug!(url = %request.url, ?kind, "serving cached entry, revalidating in background");
            let url = request.url.to_string();
            self.spawn_revalidation(request, kind);
            return entry.to_response(&url);
        }

        // Cache miss: the network outcome is the response
        match self.fetcher.fetch(&request).await {
            Ok(response) => {
                self.store_success(&key, &response).await;
                response
            }
            Err(error) => {
                warn!(url = %request.url, %error, "fetch failed with no cached fallback");
                Response::unavailable(kind.unavailable_body()).with_url(request.url.as_str())
            }
        }
    }

    async fn manifest(&self, request: Request) -> Response {
        let key = CacheKey::for_request(&request);

        if let Some(entry) = self.cached_entry(&key).await {
            let cached_version = parse_version_or_none(&entry.body);
            debug!(
                url = %request.url,
                cached_version = cached_version.as_deref(),
                "serving cached manifest, checking version in background"
            );
            let url = request.url.to_string();
            self.spawn_manifest_revalidation(request, cached_version);
            return entry.to_response(&url);
        }

        match self.fetcher.fetch(&request).await {
            Ok(response) => {
                self.store_success(&key, &response).await;
                response
            }
            Err(error) => {
                warn!(url = %request.url, %error, "manifest fetch failed with no cached fallback");
                Response::unavailable("Manifest unavailable").with_url(request.url.as_str())
            }
        }
    }

    async fn cached_entry(&self, key: &CacheKey) -> Option<CachedEntry> {
        match self
            .store
            .lookup(&self.config.cache_namespace, key)
            .await
        {
            Ok(entry) => entry,
            Err(error) => {
                warn!(url = %key.url, %error, "cache lookup failed, treating as miss");
                None
            }
        }
    }

    /// Write a status-200 response into the cache, logging write failures
    async fn store_success(&self, key: &CacheKey, response: &Response) {
        if response.status != 200 {
            debug!(url = %key.url, status = response.status, "not caching non-200 response");
            return;
        }
        if let Err(error) = self
            .store
            .put(
                &self.config.cache_namespace,
                key.clone(),
                CachedEntry::from_response(response),
            )
            .await
        {
            warn!(url = %key.url, %error, "cache write failed");
        }
    }

    fn report(&self, url: String, outcome: RevalidationOutcome) {
        if let Some(hook) = &self.revalidation_hook {
            let _ = hook.send(RevalidationEvent { url, outcome });
        }
    }

    fn spawn_revalidation(&self, request: Request, kind: StrategyKind) {
        let engine = self.background_handle();
        tokio::spawn(async move {
            let outcome = engine.revalidate(&request, kind).await;
            debug!(url = %request.url, ?outcome, "background revalidation finished");
            engine.report(request.url.to_string(), outcome);
        });
    }

    fn spawn_manifest_revalidation(&self, request: Request, cached_version: Option<String>) {
        let engine = self.background_handle();
        tokio::spawn(async move {
            let outcome = engine.revalidate_manifest(&request, cached_version).await;
            debug!(url = %request.url, ?outcome, "background manifest check finished");
            engine.report(request.url.to_string(), outcome);
        });
    }

    /// Cheap clone carrying the shared collaborators into a detached task
    fn background_handle(&self) -> StrategyEngine {
        StrategyEngine {
            config: Arc::clone(&self.config),
            store: Arc::clone(&self.store),
            fetcher: Arc::clone(&self.fetcher),
            notifier: Arc::clone(&self.notifier),
            revalidation_hook: self.revalidation_hook.clone(),
        }
    }

    async fn revalidate(&self, request: &Request, kind: StrategyKind) -> RevalidationOutcome {
        match self.fetcher.fetch(request).await {
            Ok(response) if response.status == 200 => {
                let key = CacheKey::for_request(request);
                if let Err(error) = self
                    .store
                    .put(
                        &self.config.cache_namespace,
                        key,
                        CachedEntry::from_response(&response),
                    )
                    .await
                {
                    warn!(url = %request.url, %error, "revalidation cache write failed");
                    return RevalidationOutcome::Failed;
                }
                if kind == StrategyKind::Feed {
                    self.notifier
                        .broadcast(WorkerMessage::feed_updated(request.url.as_str()))
                        .await;
                }
                RevalidationOutcome::Refreshed
            }
            Ok(response) => {
                debug!(
                    url = %request.url,
                    status = response.status,
                    reason = response.status_text(),
                    "revalidation returned non-success, keeping cached entry"
                );
                RevalidationOutcome::Unchanged
            }
            Err(error) => {
                debug!(url = %request.url, %error, "revalidation fetch failed");
                RevalidationOutcome::Failed
            }
        }
    }

    async fn revalidate_manifest(
        &self,
        request: &Request,
        cached_version: Option<String>,
    ) -> RevalidationOutcome {
        let response = match self.fetcher.fetch(request).await {
            Ok(response) if response.status == 200 => response,
            Ok(response) => {
                debug!(
                    url = %request.url,
                    status = response.status,
                    reason = response.status_text(),
                    "manifest revalidation returned non-success"
                );
                return RevalidationOutcome::Unchanged;
            }
            Err(error) => {
                debug!(url = %request.url, %error, "manifest revalidation fetch failed");
                return RevalidationOutcome::Failed;
            }
        };

        let key = CacheKey::for_request(request);
        match parse_version_or_none(&response.body) {
            None => {
                // Unreadable fresh version: prefer having some cached
                // manifest to having none
                self.store_success(&key, &response).await;
                RevalidationOutcome::Refreshed
            }
            Some(fresh_version) => {
                if is_newer_version(Some(&fresh_version), cached_version.as_deref()) {
                    self.store_success(&key, &response).await;
                    self.notifier
                        .broadcast(WorkerMessage::manifest_version_updated(
                            fresh_version.clone(),
                            cached_version.clone(),
                        ))
                        .await;
                    debug!(
                        url = %request.url,
                        fresh = %fresh_version,
                        cached = cached_version.as_deref(),
                        "manifest version updated"
                    );
                    RevalidationOutcome::Refreshed
                } else {
                    debug!(
                        url = %request.url,
                        fresh = %fresh_version,
                        cached = cached_version.as_deref(),
                        "manifest version not newer, cache untouched"
                    );
                    RevalidationOutcome::Unchanged
                }
            }
        }
    }
}
