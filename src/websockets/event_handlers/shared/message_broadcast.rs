use std::sync::Arc;

use crate::websockets::{
    connection_manager::ConnectionManager, event_handlers::SessionEventError,
    messages::WebSocketMessage,
};

/// The three delivery primitives the session core uses: direct ack to one
/// connection, broadcast to a room's members, and broadcast to a room's
/// members minus the originating connection.
pub struct MessageBroadcaster;

impl MessageBroadcaster {
    pub async fn send_to_connection(
        connection_manager: &Arc<dyn ConnectionManager>,
        connection_id: &str,
        message: &WebSocketMessage,
    ) -> Result<(), SessionEventError> {
        let message_json = serde_json::to_string(message)?;
        connection_manager
            .send_to_connection(connection_id, &message_json)
            .await;
        Ok(())
    }

    pub async fn broadcast_to_connections(
        connection_manager: &Arc<dyn ConnectionManager>,
        connection_ids: &[String],
        message: &WebSocketMessage,
    ) -> Result<(), SessionEventError> {
        let message_json = serde_json::to_string(message)?;
        connection_manager
            .send_to_connections(connection_ids, &message_json)
            .await;
        Ok(())
    }

    pub async fn broadcast_to_connections_except(
        connection_manager: &Arc<dyn ConnectionManager>,
        connection_ids: &[String],
        excluded: &str,
        message: &WebSocketMessage,
    ) -> Result<(), SessionEventError> {
        let message_json = serde_json::to_string(message)?;
        for connection_id in connection_ids {
            if connection_id != excluded {
                connection_manager
                    .send_to_connection(connection_id, &message_json)
                    .await;
            }
        }
        Ok(())
    }
}
