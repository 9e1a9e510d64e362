//! Shared test doubles for the worker's collaborators.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use url::Url;

use crate::WorkerError;
use crate::clients::{ClientNotifier, WorkerMessage};
use crate::config::WorkerConfig;
use crate::fetcher::Fetcher;
use crate::http::{Request, Response};

/// Installs a test-writer tracing subscriber, ignoring repeat installs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Scripted fetcher: hands out queued results in order, or hangs forever
/// when told to, so tests can observe behavior while a fetch is pending.
pub struct MockFetcher {
    responses: Mutex<VecDeque<Result<Response, WorkerError>>>,
    calls: Mutex<Vec<String>>,
    hold: AtomicBool,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            hold: AtomicBool::new(false),
        }
    }

    /// Queue a successful response
    pub fn script_ok(&self, response: Response) {
        self.responses.lock().push_back(Ok(response));
    }

    /// Queue a failed fetch
    pub fn script_err(&self, message: &str) {
        self.responses
            .lock()
            .push_back(Err(WorkerError::Io(std::io::Error::other(
                message.to_owned(),
            ))));
    }

    /// Make every subsequent fetch pend forever
    pub fn hold_fetches(&self) {
        self.hold.store(true, Ordering::SeqCst);
    }

    /// URLs fetched so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response, WorkerError> {
        self.calls.lock().push(request.url.to_string());

        if self.hold.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }

        match self.responses.lock().pop_front() {
            Some(result) => result,
            None => Err(WorkerError::Io(std::io::Error::other(
                "no scripted response",
            ))),
        }
    }
}

/// Notifier that records every broadcast and claim
pub struct RecordingNotifier {
    messages: Mutex<Vec<WorkerMessage>>,
    claimed: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            claimed: AtomicBool::new(false),
        }
    }

    pub fn messages(&self) -> Vec<WorkerMessage> {
        self.messages.lock().clone()
    }

    pub fn claimed(&self) -> bool {
        self.claimed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClientNotifier for RecordingNotifier {
    async fn broadcast(&self, message: WorkerMessage) {
        self.messages.lock().push(message);
    }

    async fn claim(&self) {
        self.claimed.store(true, Ordering::SeqCst);
    }
}

/// Feed URL on the default configuration's feed host
pub fn feed_url(name: &str) -> Url {
    let host = WorkerConfig::default().feed_host;
    Url::parse(&format!("https://{host}/rss/{name}")).unwrap()
}

/// Application-origin URL for the given path
pub fn generic_url(path: &str) -> Url {
    WorkerConfig::default().origin.join(path).unwrap()
}
