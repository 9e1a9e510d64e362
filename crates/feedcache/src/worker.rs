//! # Offline Worker
//!
//! The worker ties the lifecycle together: install pre-caches critical
//! assets, activate purges stale cache namespaces and claims clients, and
//! every intercepted fetch is dispatched to the strategy engine. Host
//! events arrive as explicit method calls, so the whole lifecycle is
//! drivable without a browser host.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::WorkerError;
use crate::cache::{CacheKey, CacheStore, CachedEntry};
use crate::clients::{ClientMessage, ClientNotifier};
use crate::config::WorkerConfig;
use crate::fetcher::Fetcher;
use crate::http::{Request, Response};
use crate::strategy::{RevalidationEvent, StrategyEngine};

/// Background-sync tag that triggers a feed sync
pub const SYNC_FEEDS_TAG: &str = "sync-feeds";

/// Lifecycle state of the worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Pre-caching critical assets
    Installing,
    /// Install finished, eligible for activation
    Installed,
    /// Purging stale namespaces and claiming clients
    Activating,
    /// Controlling clients and intercepting fetches
    Activated,
    /// Replaced; never intercepts again
    Redundant,
}

impl WorkerState {
    /// Whether fetch interception is allowed in this state
    pub fn can_intercept(&self) -> bool {
        matches!(self, Self::Activated)
    }
}

impl std::fmt::Display for WorkerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Installing => "installing",
            Self::Installed => "installed",
            Self::Activating => "activating",
            Self::Activated => "activated",
            Self::Redundant => "redundant",
        };
        write!(f, "{name}")
    }
}

/// The request interceptor and cache strategy selector
pub struct OfflineWorker {
    config: Arc<WorkerConfig>,
    store: Arc<dyn CacheStore>,
    fetcher: Arc<dyn Fetcher>,
    notifier: Arc<dyn ClientNotifier>,
    engine: StrategyEngine,
    state: WorkerState,
}

impl OfflineWorker {
    /// Create a worker over the given collaborators
    pub fn new(
        config: WorkerConfig,
        store: Arc<dyn CacheStore>,
        fetcher: Arc<dyn Fetcher>,
        notifier: Arc<dyn ClientNotifier>,
    ) -> Self {
        let config = Arc::new(config);
        let engine = StrategyEngine::new(
            Arc::clone(&config),
            Arc::clone(&store),
            Arc::clone(&fetcher),
            Arc::clone(&notifier),
        );

        Self {
            config,
            store,
            fetcher,
            notifier,
            engine,
            state: WorkerState::Installing,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Worker configuration
    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Observe background revalidation tasks as they complete
    pub fn set_revalidation_hook(&mut self, hook: mpsc::UnboundedSender<RevalidationEvent>) {
        self.engine.set_revalidation_hook(hook);
    }

    /// Install event: best-effort pre-cache of the configured asset paths
    ///
    /// Individual asset failures are logged and swallowed; install always
    /// completes. The worker takes over immediately rather than waiting
    /// behind a previous instance.
    pub async fn install(&mut self) -> Result<(), WorkerError> {
        if self.state != WorkerState::Installing {
            return Err(WorkerError::InvalidState {
                expected: "installing",
                actual: self.state,
            });
        }

        let mut cached = 0usize;
        for asset in &self.config.precache_assets {
            let url = match self.config.origin.join(asset) {
                Ok(url) => url,
                Err(error) => {
                    warn!(asset = %asset, %error, "precache path does not resolve, skipping");
                    continue;
                }
            };

            let request = Request::get(url);
            match self.fetcher.fetch(&request).await {
                Ok(response) if response.status == 200 => {
                    let key = CacheKey::for_request(&request);
                    match self
                        .store
                        .put(
                            &self.config.cache_namespace,
                            key,
                            CachedEntry::from_response(&response),
                        )
                        .await
                    {
                        Ok(()) => cached += 1,
                        Err(error) => {
                            warn!(asset = %asset, %error, "precache write failed, skipping")
                        }
                    }
                }
                Ok(response) => {
                    warn!(
                        asset = %asset,
                        status = response.status,
                        "precache fetch returned non-success, skipping"
                    );
                }
                Err(error) => {
                    warn!(asset = %asset, %error, "precache fetch failed, skipping");
                }
            }
        }

        self.state = WorkerState::Installed;
        info!(
            namespace = %self.config.cache_namespace,
            cached,
            total = self.config.precache_assets.len(),
            "worker installed"
        );
        Ok(())
    }

    /// Activate event: purge every namespace except the current one, then
    /// claim all connected clients
    pub async fn activate(&mut self) -> Result<(), WorkerError> {
        if self.state != WorkerState::Installed {
            return Err(WorkerError::InvalidState {
                expected: "installed",
                actual: self.state,
            });
        }
        self.state = WorkerState::Activating;

        let names = self.store.namespaces().await?;
        for name in names {
            if name != self.config.cache_namespace {
                self.store.delete_namespace(&name).await?;
                info!(namespace = %name, "purged stale cache namespace");
            }
        }

        self.notifier.claim().await;
        self.state = WorkerState::Activated;
        info!(namespace = %self.config.cache_namespace, "worker activated");
        Ok(())
    }

    /// Fetch-intercept event
    ///
    /// Never fails: before activation the request passes straight through
    /// to the network; afterwards the classified strategy runs, and every
    /// failure path collapses into a cached fallback or a synthetic 503.
    pub async fn handle_fetch(&self, request: Request) -> Response {
        if !self.state.can_intercept() {
            debug!(url = %request.url, state = %self.state, "not activated, passing through");
            return self.engine.network_only(&request).await;
        }
        self.engine.handle(request).await
    }

    /// Message event from an application instance
    pub async fn handle_message(&mut self, message: ClientMessage) -> Result<(), WorkerError> {
        match message {
            ClientMessage::SkipWaiting => {
                info!(state = %self.state, "skip-waiting requested");
                if self.state == WorkerState::Installed {
                    self.activate().await?;
                }
                Ok(())
            }
        }
    }

    /// Background-sync event
    pub async fn handle_sync(&self, tag: &str) {
        match tag {
            SYNC_FEEDS_TAG => self.sync_feeds().await,
            other => debug!(tag = other, "ignoring unknown sync tag"),
        }
    }

    // Feed sync has no behavior yet; the handler exists so hosts can
    // already register the sync tag.
    async fn sync_feeds(&self) {
        debug!("feed sync requested");
    }

    /// Mark the worker redundant; it never intercepts again
    pub fn retire(&mut self) {
        self.state = WorkerState::Redundant;
        info!("worker retired");
    }
}
