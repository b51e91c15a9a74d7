use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    session::{JoinOutcome, SessionRegistry},
    websockets::{
        connection_manager::ConnectionManager,
        event_handlers::SessionEventError,
        messages::{CreateRoomPayload, JoinRoomPayload, WebSocketMessage},
    },
};

use super::shared::MessageBroadcaster;

/// Handlers for room creation and the join/synchronization protocol
pub struct SessionEventHandlers {
    registry: Arc<SessionRegistry>,
    connection_manager: Arc<dyn ConnectionManager>,
}

impl SessionEventHandlers {
    pub fn new(
        registry: Arc<SessionRegistry>,
        connection_manager: Arc<dyn ConnectionManager>,
    ) -> Self {
        Self {
            registry,
            connection_manager,
        }
    }

    /// Creates a room hosted by the caller and acks it with the full
    /// authoritative state so the client renders without a second round
    /// trip. Never fails.
    pub async fn handle_create_room(
        &self,
        connection_id: &str,
        payload: CreateRoomPayload,
    ) -> Result<(), SessionEventError> {
        let room = self
            .registry
            .create_room(connection_id, &payload.player_name);

        let ack = WebSocketMessage::room_created(&room, connection_id.to_string());
        MessageBroadcaster::send_to_connection(&self.connection_manager, connection_id, &ack)
            .await?;

        info!(
            room_id = %room.room_id,
            host_id = %connection_id,
            "Room creation acked to host"
        );

        Ok(())
    }

    /// Joins the caller into a room.
    ///
    /// On success the caller gets exactly one ack built from post-insertion
    /// state, and everyone else gets exactly one PLAYER_JOINED announcement;
    /// the joiner never sees its own announcement. Failures are reported
    /// only through the ack.
    pub async fn handle_join_room(
        &self,
        connection_id: &str,
        payload: JoinRoomPayload,
    ) -> Result<(), SessionEventError> {
        let outcome =
            self.registry
                .join_room(&payload.room_id, connection_id, &payload.player_name);

        match outcome {
            JoinOutcome::Joined { room, player } => {
                let ack = WebSocketMessage::join_success(&room, connection_id.to_string());
                MessageBroadcaster::send_to_connection(
                    &self.connection_manager,
                    connection_id,
                    &ack,
                )
                .await?;

                let announcement = WebSocketMessage::player_joined(&player);
                MessageBroadcaster::broadcast_to_connections_except(
                    &self.connection_manager,
                    &room.member_ids(),
                    connection_id,
                    &announcement,
                )
                .await?;

                info!(
                    room_id = %room.room_id,
                    player_id = %connection_id,
                    players_notified = room.player_count() - 1,
                    "Join acked and announced"
                );
            }
            JoinOutcome::RoomNotFound => {
                debug!(room_id = %payload.room_id, "Join failed: room not found");
                let ack = WebSocketMessage::join_failure("Room not found".to_string());
                MessageBroadcaster::send_to_connection(
                    &self.connection_manager,
                    connection_id,
                    &ack,
                )
                .await?;
            }
            JoinOutcome::RoomFull => {
                debug!(room_id = %payload.room_id, "Join failed: room full");
                let ack = WebSocketMessage::join_failure("Room full".to_string());
                MessageBroadcaster::send_to_connection(
                    &self.connection_manager,
                    connection_id,
                    &ack,
                )
                .await?;
            }
        }

        Ok(())
    }
}
