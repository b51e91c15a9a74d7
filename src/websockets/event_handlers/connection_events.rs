use std::sync::Arc;
use tracing::info;

use crate::{
    session::SessionRegistry,
    websockets::{
        connection_manager::ConnectionManager, event_handlers::SessionEventError,
        messages::WebSocketMessage,
    },
};

use super::shared::MessageBroadcaster;

/// Handlers for transport-level connection lifecycle events
pub struct ConnectionEventHandlers {
    registry: Arc<SessionRegistry>,
    connection_manager: Arc<dyn ConnectionManager>,
}

impl ConnectionEventHandlers {
    pub fn new(
        registry: Arc<SessionRegistry>,
        connection_manager: Arc<dyn ConnectionManager>,
    ) -> Self {
        Self {
            registry,
            connection_manager,
        }
    }

    /// Best-effort cleanup after a connection terminated: removes the
    /// player from every room that contained it and tells the remaining
    /// members, one PLAYER_LEFT per affected room. Emptied rooms are
    /// already gone by the time this notifies anyone.
    pub async fn handle_disconnect(&self, connection_id: &str) -> Result<(), SessionEventError> {
        let departures = self.registry.remove_connection(connection_id);

        for departure in departures {
            let message = WebSocketMessage::player_left(connection_id.to_string());
            MessageBroadcaster::broadcast_to_connections(
                &self.connection_manager,
                &departure.remaining,
                &message,
            )
            .await?;

            info!(
                room_id = %departure.room_id,
                player_id = %connection_id,
                player_name = %departure.player_name,
                room_deleted = departure.room_deleted,
                "Departure broadcast to remaining members"
            );
        }

        Ok(())
    }
}
