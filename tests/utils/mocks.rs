use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

use bullethell::websockets::{ConnectionManager, MessageType, WebSocketMessage};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Connection manager that records every outbound frame per connection,
/// so tests can assert exactly who was told what.
#[derive(Clone)]
pub struct MockConnectionManager {
    sent_messages: Arc<RwLock<HashMap<String, Vec<String>>>>,
    connected: Arc<RwLock<Vec<String>>>,
}

impl MockConnectionManager {
    pub fn new() -> Self {
        Self {
            sent_messages: Arc::new(RwLock::new(HashMap::new())),
            connected: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn add_connected(&self, connection_id: &str) {
        self.connected.write().await.push(connection_id.to_string());
    }

    /// Raw frames delivered to one connection, in order
    pub async fn raw_messages_for(&self, connection_id: &str) -> Vec<String> {
        self.sent_messages
            .read()
            .await
            .get(connection_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Parsed frames delivered to one connection, in order
    pub async fn messages_for(&self, connection_id: &str) -> Vec<WebSocketMessage> {
        self.raw_messages_for(connection_id)
            .await
            .iter()
            .map(|raw| serde_json::from_str(raw).expect("mock recorded invalid frame"))
            .collect()
    }

    /// Payloads of every frame of the given type sent to one connection
    pub async fn payloads_of_type(
        &self,
        connection_id: &str,
        message_type: MessageType,
    ) -> Vec<serde_json::Value> {
        self.messages_for(connection_id)
            .await
            .into_iter()
            .filter(|m| m.message_type == message_type)
            .map(|m| m.payload)
            .collect()
    }

    pub async fn total_message_count(&self) -> usize {
        self.sent_messages
            .read()
            .await
            .values()
            .map(|msgs| msgs.len())
            .sum()
    }

    pub async fn clear_messages(&self) {
        self.sent_messages.write().await.clear();
    }
}

#[async_trait]
impl ConnectionManager for MockConnectionManager {
    async fn add_connection(&self, connection_id: String, _sender: mpsc::UnboundedSender<String>) {
        self.add_connected(&connection_id).await;
    }

    async fn remove_connection(&self, connection_id: &str) {
        self.connected.write().await.retain(|c| c != connection_id);
    }

    async fn send_to_connection(&self, connection_id: &str, message: &str) {
        self.sent_messages
            .write()
            .await
            .entry(connection_id.to_string())
            .or_default()
            .push(message.to_string());
    }

    async fn send_to_connections(&self, connection_ids: &[String], message: &str) {
        for connection_id in connection_ids {
            self.send_to_connection(connection_id, message).await;
        }
    }
}
