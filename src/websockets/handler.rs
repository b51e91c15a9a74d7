use async_trait::async_trait;
use axum::{
    extract::{State, WebSocketUpgrade},
    response::Response,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::session::SessionRegistry;
use crate::shared::AppState;
use crate::websockets::connection_manager::ConnectionManager;
use crate::websockets::event_handlers::{
    ConnectionEventHandlers, GameEventHandlers, SessionEventHandlers,
};
use crate::websockets::messages::{MessageType, WebSocketMessage};

use super::socket::{Connection, MessageHandler};

/// Message handler for receiving WebSocket messages from the client
pub struct WebsocketReceiveHandler {
    session_events: SessionEventHandlers,
    game_events: GameEventHandlers,
}

impl WebsocketReceiveHandler {
    pub fn new(
        registry: Arc<SessionRegistry>,
        connection_manager: Arc<dyn ConnectionManager>,
    ) -> Self {
        Self {
            session_events: SessionEventHandlers::new(
                registry.clone(),
                connection_manager.clone(),
            ),
            game_events: GameEventHandlers::new(registry, connection_manager),
        }
    }

    fn parse_payload<T: DeserializeOwned>(
        connection_id: &str,
        message_type: &MessageType,
        payload: serde_json::Value,
    ) -> Option<T> {
        match serde_json::from_value(payload) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!(
                    connection_id = %connection_id,
                    message_type = ?message_type,
                    error = %e,
                    "Malformed payload, dropping message"
                );
                None
            }
        }
    }
}

#[async_trait]
impl MessageHandler for WebsocketReceiveHandler {
    async fn handle_message(&self, connection_id: &str, message: String) {
        let ws_message = match serde_json::from_str::<WebSocketMessage>(&message) {
            Ok(ws_message) => ws_message,
            Err(e) => {
                warn!(
                    connection_id = %connection_id,
                    error = %e,
                    "Failed to parse WebSocket message"
                );
                return;
            }
        };

        let message_type = ws_message.message_type.clone();
        let payload = ws_message.payload;

        let result = match message_type {
            MessageType::CreateRoom => {
                match Self::parse_payload(connection_id, &message_type, payload) {
                    Some(payload) => {
                        self.session_events
                            .handle_create_room(connection_id, payload)
                            .await
                    }
                    None => return,
                }
            }
            MessageType::JoinRoom => {
                match Self::parse_payload(connection_id, &message_type, payload) {
                    Some(payload) => {
                        self.session_events
                            .handle_join_room(connection_id, payload)
                            .await
                    }
                    None => return,
                }
            }
            MessageType::PlayerInput => {
                match Self::parse_payload(connection_id, &message_type, payload) {
                    Some(payload) => {
                        self.game_events
                            .handle_player_input(connection_id, payload)
                            .await
                    }
                    None => return,
                }
            }
            // shot payloads are an opaque passthrough, no typed parse
            MessageType::PlayerShoot => {
                self.game_events
                    .handle_player_shoot(connection_id, payload)
                    .await
            }
            MessageType::WaveCleared => {
                match Self::parse_payload(connection_id, &message_type, payload) {
                    Some(payload) => {
                        self.game_events
                            .handle_wave_cleared(connection_id, payload)
                            .await
                    }
                    None => return,
                }
            }
            MessageType::SkillTreeChoice => {
                match Self::parse_payload(connection_id, &message_type, payload) {
                    Some(payload) => {
                        self.game_events
                            .handle_skill_tree_choice(connection_id, payload)
                            .await
                    }
                    None => return,
                }
            }
            MessageType::StartGame => {
                match Self::parse_payload(connection_id, &message_type, payload) {
                    Some(payload) => {
                        self.game_events
                            .handle_start_game(connection_id, payload)
                            .await
                    }
                    None => return,
                }
            }
            _ => {
                debug!(
                    connection_id = %connection_id,
                    message_type = ?message_type,
                    "Unhandled message type"
                );
                return;
            }
        };

        if let Err(e) = result {
            warn!(
                connection_id = %connection_id,
                error = %e,
                "Failed to handle session event"
            );
        }
    }
}

/// WebSocket endpoint: every upgraded socket gets a fresh opaque
/// connection id, which doubles as the player id in any room it joins.
/// GET /ws
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_websocket_connection(socket, app_state))
}

/// Handle the upgraded WebSocket connection
async fn handle_websocket_connection(socket: axum::extract::ws::WebSocket, app_state: AppState) {
    let connection_id = uuid::Uuid::new_v4().to_string();

    info!(connection_id = %connection_id, "Player connected");

    // Create the outbound channel (app -> client) and register it so
    // acks and broadcasts can reach this connection
    let (outbound_sender, outbound_receiver) = mpsc::unbounded_channel::<String>();
    app_state
        .connection_manager
        .add_connection(connection_id.clone(), outbound_sender)
        .await;

    let message_handler = Arc::new(WebsocketReceiveHandler::new(
        app_state.registry.clone(),
        app_state.connection_manager.clone(),
    ));

    let connection = Connection::new(
        connection_id.clone(),
        Box::new(socket),
        outbound_receiver,
        message_handler,
    );

    // Run the connection until disconnect
    match connection.run().await {
        Ok(()) => {
            info!(connection_id = %connection_id, "WebSocket connection closed cleanly");
        }
        Err(e) => {
            warn!(
                connection_id = %connection_id,
                error = ?e,
                "WebSocket connection error"
            );
        }
    }

    // Cleanup: unregister the sender, then sweep the registry and notify
    // the rooms this connection belonged to
    app_state
        .connection_manager
        .remove_connection(&connection_id)
        .await;

    let connection_events = ConnectionEventHandlers::new(
        app_state.registry.clone(),
        app_state.connection_manager.clone(),
    );
    if let Err(e) = connection_events.handle_disconnect(&connection_id).await {
        warn!(
            connection_id = %connection_id,
            error = %e,
            "Disconnect cleanup failed"
        );
    }

    info!(connection_id = %connection_id, "Player disconnected");
}
