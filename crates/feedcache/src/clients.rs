//! # Client Notification
//!
//! Messages exchanged with active application instances, plus the
//! `ClientHub` that fans broadcasts out to every connected client. Delivery
//! is best-effort: no acknowledgment, no retry, no ordering guarantee
//! across clients.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

/// Messages broadcast to application instances
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerMessage {
    /// A feed document was refreshed in the background
    #[serde(rename_all = "camelCase")]
    FeedUpdated { url: String, timestamp: u64 },
    /// A strictly newer manifest version was cached
    #[serde(rename_all = "camelCase")]
    ManifestVersionUpdated {
        new_version: String,
        old_version: Option<String>,
        timestamp: u64,
    },
}

impl WorkerMessage {
    /// Feed-updated message stamped with the current time
    pub fn feed_updated(url: impl Into<String>) -> Self {
        Self::FeedUpdated {
            url: url.into(),
            timestamp: unix_millis(),
        }
    }

    /// Manifest-version-updated message stamped with the current time
    pub fn manifest_version_updated(
        new_version: impl Into<String>,
        old_version: Option<String>,
    ) -> Self {
        Self::ManifestVersionUpdated {
            new_version: new_version.into(),
            old_version,
            timestamp: unix_millis(),
        }
    }
}

/// Messages accepted from application instances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMessage {
    /// Force immediate activation of an installed worker
    SkipWaiting,
}

fn unix_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// A collaborator able to deliver messages to active clients
#[async_trait]
pub trait ClientNotifier: Send + Sync {
    /// Deliver the same message to every active client
    async fn broadcast(&self, message: WorkerMessage);

    /// Take control of all currently connected clients
    async fn claim(&self);
}

/// Opaque identifier for one connected client
pub type ClientId = u64;

struct ClientSlot {
    sender: mpsc::UnboundedSender<WorkerMessage>,
    controlled: bool,
}

/// Registry of active application instances
///
/// Each connected client holds the receiving half of an unbounded channel;
/// clients whose receiver has been dropped are pruned on the next
/// broadcast.
pub struct ClientHub {
    clients: RwLock<HashMap<ClientId, ClientSlot>>,
    next_id: AtomicU64,
}

impl ClientHub {
    /// Create an empty hub
    pub fn new() -> Self {
        Self {
            clients: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a client, returning its id and message receiver
    pub fn connect(&self) -> (ClientId, mpsc::UnboundedReceiver<WorkerMessage>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.clients.write().insert(
            id,
            ClientSlot {
                sender,
                controlled: false,
            },
        );
        debug!(client_id = id, "client connected");
        (id, receiver)
    }

    /// Remove a client explicitly
    pub fn disconnect(&self, id: ClientId) {
        if self.clients.write().remove(&id).is_some() {
            debug!(client_id = id, "client disconnected");
        }
    }

    /// Number of currently registered clients
    pub fn client_count(&self) -> usize {
        self.clients.read().len()
    }

    /// Number of clients currently under worker control
    pub fn controlled_count(&self) -> usize {
        self.clients.read().values().filter(|c| c.controlled).count()
    }
}

impl Default for ClientHub {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClientNotifier for ClientHub {
    async fn broadcast(&self, message: WorkerMessage) {
        let mut clients = self.clients.write();
        let before = clients.len();
        clients.retain(|id, slot| {
            let delivered = slot.sender.send(message.clone()).is_ok();
            if !delivered {
                debug!(client_id = id, "pruning disconnected client");
            }
            delivered
        });
        debug!(
            delivered = clients.len(),
            pruned = before - clients.len(),
            "broadcast complete"
        );
    }

    async fn claim(&self) {
        let mut clients = self.clients.write();
        for slot in clients.values_mut() {
            slot.controlled = true;
        }
        debug!(clients = clients.len(), "claimed all clients");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_updated_wire_shape() {
        let message = WorkerMessage::FeedUpdated {
            url: "https://feeds.example/rss/news".to_owned(),
            timestamp: 42,
        };
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["type"], "FEED_UPDATED");
        assert_eq!(json["url"], "https://feeds.example/rss/news");
        assert_eq!(json["timestamp"], 42);
    }

    #[test]
    fn test_manifest_updated_wire_shape() {
        let message = WorkerMessage::ManifestVersionUpdated {
            new_version: "1.3.0".to_owned(),
            old_version: Some("1.2.9".to_owned()),
            timestamp: 42,
        };
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["type"], "MANIFEST_VERSION_UPDATED");
        assert_eq!(json["newVersion"], "1.3.0");
        assert_eq!(json["oldVersion"], "1.2.9");
    }

    #[test]
    fn test_skip_waiting_wire_shape() {
        let parsed: ClientMessage = serde_json::from_str(r#"{"type":"SKIP_WAITING"}"#).unwrap();
        assert_eq!(parsed, ClientMessage::SkipWaiting);
    }

    #[tokio::test]
    async fn test_broadcast_reaches_every_client() {
        let hub = ClientHub::new();
        let (_id1, mut rx1) = hub.connect();
        let (_id2, mut rx2) = hub.connect();

        hub.broadcast(WorkerMessage::feed_updated("https://feeds.example/rss/a"))
            .await;

        assert!(matches!(
            rx1.try_recv().unwrap(),
            WorkerMessage::FeedUpdated { .. }
        ));
        assert!(matches!(
            rx2.try_recv().unwrap(),
            WorkerMessage::FeedUpdated { .. }
        ));
    }

    #[tokio::test]
    async fn test_broadcast_prunes_dropped_clients() {
        let hub = ClientHub::new();
        let (_id1, rx1) = hub.connect();
        let (_id2, _rx2) = hub.connect();
        drop(rx1);

        hub.broadcast(WorkerMessage::feed_updated("https://feeds.example/rss/a"))
            .await;

        assert_eq!(hub.client_count(), 1);
    }

    #[tokio::test]
    async fn test_claim_controls_all_clients() {
        let hub = ClientHub::new();
        let (_id1, _rx1) = hub.connect();
        let (_id2, _rx2) = hub.connect();
        assert_eq!(hub.controlled_count(), 0);

        hub.claim().await;

        assert_eq!(hub.controlled_count(), 2);
    }

    #[tokio::test]
    async fn test_disconnect_removes_client() {
        let hub = ClientHub::new();
        let (id, _rx) = hub.connect();
        assert_eq!(hub.client_count(), 1);
        hub.disconnect(id);
        assert_eq!(hub.client_count(), 0);
    }
}
