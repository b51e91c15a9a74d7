use std::sync::{Arc, Mutex};

use bullethell::session::{RoomCodeGenerator, SeedGenerator, SessionRegistry};
use bullethell::websockets::event_handlers::ConnectionEventHandlers;
use bullethell::websockets::{
    ConnectionManager, MessageHandler, MessageType, WebsocketReceiveHandler,
};
use serde_json::{json, Value};

use super::mocks::MockConnectionManager;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

/// Room code generator that hands out a fixed sequence, so tests know the
/// codes up front
pub struct SequentialCodeGenerator {
    codes: Mutex<Vec<String>>,
}

impl SequentialCodeGenerator {
    pub fn new(codes: &[&str]) -> Self {
        Self {
            codes: Mutex::new(codes.iter().rev().map(|c| c.to_string()).collect()),
        }
    }
}

impl RoomCodeGenerator for SequentialCodeGenerator {
    fn generate(&self) -> String {
        self.codes.lock().unwrap().pop().expect("ran out of codes")
    }
}

pub struct FixedSeedGenerator(pub u64);

impl SeedGenerator for FixedSeedGenerator {
    fn generate(&self) -> u64 {
        self.0
    }
}

pub const TEST_SEED: u64 = 424_242;

/// A registry plus handlers wired to a recording connection manager,
/// driven by raw client frames exactly as the socket layer would
pub struct TestSetup {
    pub registry: Arc<SessionRegistry>,
    pub connections: Arc<MockConnectionManager>,
    pub receive_handler: WebsocketReceiveHandler,
    connection_events: ConnectionEventHandlers,
}

pub struct TestSetupBuilder {
    room_codes: Vec<String>,
    seed: u64,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            room_codes: vec!["ABC123".to_string()],
            seed: TEST_SEED,
        }
    }

    pub fn with_room_codes(mut self, codes: &[&str]) -> Self {
        self.room_codes = codes.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn build(self) -> TestSetup {
        let codes: Vec<&str> = self.room_codes.iter().map(|c| c.as_str()).collect();
        let registry = Arc::new(SessionRegistry::with_generators(
            Box::new(SequentialCodeGenerator::new(&codes)),
            Box::new(FixedSeedGenerator(self.seed)),
        ));

        let connections = Arc::new(MockConnectionManager::new());
        let connection_manager: Arc<dyn ConnectionManager> = connections.clone();

        let receive_handler =
            WebsocketReceiveHandler::new(registry.clone(), connection_manager.clone());
        let connection_events =
            ConnectionEventHandlers::new(registry.clone(), connection_manager);

        TestSetup {
            registry,
            connections,
            receive_handler,
            connection_events,
        }
    }
}

impl Default for TestSetupBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestSetup {
    /// Feed one raw client frame through the receive handler, as the
    /// socket layer does for a live connection
    pub async fn send_raw(&self, connection_id: &str, frame: String) {
        self.receive_handler
            .handle_message(connection_id, frame)
            .await;
    }

    pub async fn send(&self, connection_id: &str, frame: Value) {
        self.send_raw(connection_id, frame.to_string()).await;
    }

    /// Simulate the transport-generated disconnect for a connection
    pub async fn disconnect(&self, connection_id: &str) {
        self.connections.remove_connection(connection_id).await;
        self.connection_events
            .handle_disconnect(connection_id)
            .await
            .expect("disconnect cleanup should not fail");
    }

    pub async fn create_room(&self, connection_id: &str, player_name: &str) -> String {
        self.connections.add_connected(connection_id).await;
        self.send(
            connection_id,
            json!({
                "type": "CREATE_ROOM",
                "payload": { "player_name": player_name }
            }),
        )
        .await;

        let acks = self
            .connections
            .payloads_of_type(connection_id, MessageType::RoomCreated)
            .await;
        acks.last().expect("expected a ROOM_CREATED ack")["room_id"]
            .as_str()
            .expect("ack carries the room id")
            .to_string()
    }

    pub async fn join_room(&self, connection_id: &str, room_id: &str, player_name: &str) {
        self.connections.add_connected(connection_id).await;
        self.send(
            connection_id,
            json!({
                "type": "JOIN_ROOM",
                "payload": { "room_id": room_id, "player_name": player_name }
            }),
        )
        .await;
    }

    /// The most recent JOIN_RESULT ack delivered to a connection
    pub async fn last_join_result(&self, connection_id: &str) -> Value {
        self.connections
            .payloads_of_type(connection_id, MessageType::JoinResult)
            .await
            .pop()
            .expect("expected a JOIN_RESULT ack")
    }
}
