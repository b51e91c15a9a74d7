use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::{
    session::SessionRegistry,
    websockets::{
        connection_manager::ConnectionManager,
        event_handlers::SessionEventError,
        messages::{
            PlayerInputPayload, SkillTreeChoicePayload, StartGamePayload, WaveClearedPayload,
            WebSocketMessage,
        },
    },
};

use super::shared::MessageBroadcaster;

/// Handlers for in-game relay traffic: authoritative input merges, shot
/// passthrough and the host-gated progression actions.
pub struct GameEventHandlers {
    registry: Arc<SessionRegistry>,
    connection_manager: Arc<dyn ConnectionManager>,
}

impl GameEventHandlers {
    pub fn new(
        registry: Arc<SessionRegistry>,
        connection_manager: Arc<dyn ConnectionManager>,
    ) -> Self {
        Self {
            registry,
            connection_manager,
        }
    }

    /// Merges the caller's reported position (and health, when present)
    /// into authoritative state, then relays the update to the rest of the
    /// room. Input for a room the caller is not in is dropped silently;
    /// that is the normal race of packets arriving after a leave.
    pub async fn handle_player_input(
        &self,
        connection_id: &str,
        payload: PlayerInputPayload,
    ) -> Result<(), SessionEventError> {
        let update = match self.registry.apply_input(
            &payload.room_id,
            connection_id,
            payload.x,
            payload.y,
            payload.hp,
        ) {
            Some(update) => update,
            None => return Ok(()),
        };

        let message = WebSocketMessage::player_update(
            connection_id.to_string(),
            update.x,
            update.y,
            update.hp,
        );
        MessageBroadcaster::broadcast_to_connections(
            &self.connection_manager,
            &update.recipients,
            &message,
        )
        .await
    }

    /// Relays fire-and-forget shot data to the whole room, caller included.
    ///
    /// Membership is not validated: shots are VFX/hit-registration data,
    /// not authoritative state. The payload is an opaque passthrough; only
    /// `room_id` is read (and stripped) before the shooter id is merged in.
    pub async fn handle_player_shoot(
        &self,
        connection_id: &str,
        payload: Value,
    ) -> Result<(), SessionEventError> {
        let mut shot = match payload {
            Value::Object(map) => map,
            _ => return Ok(()),
        };

        let room_id = match shot.remove("room_id") {
            Some(Value::String(room_id)) if !room_id.is_empty() => room_id,
            _ => return Ok(()),
        };

        let members = self.registry.room_members(&room_id);
        let message = WebSocketMessage::player_shoot(connection_id.to_string(), shot);
        MessageBroadcaster::broadcast_to_connections(&self.connection_manager, &members, &message)
            .await
    }

    /// Host only: advances the wave and hands every client the new wave
    /// number plus the room's fixed seed, so they all regenerate the same
    /// content deterministically.
    pub async fn handle_wave_cleared(
        &self,
        connection_id: &str,
        payload: WaveClearedPayload,
    ) -> Result<(), SessionEventError> {
        let advance = match self.registry.advance_wave(&payload.room_id, connection_id) {
            Some(advance) => advance,
            None => return Ok(()),
        };

        let message = WebSocketMessage::next_wave(advance.wave, advance.seed);
        MessageBroadcaster::broadcast_to_connections(
            &self.connection_manager,
            &advance.recipients,
            &message,
        )
        .await
    }

    /// Host only: records a skill choice and rebroadcasts the whole tree.
    pub async fn handle_skill_tree_choice(
        &self,
        connection_id: &str,
        payload: SkillTreeChoicePayload,
    ) -> Result<(), SessionEventError> {
        let update = match self.registry.set_skill(
            &payload.room_id,
            connection_id,
            &payload.skill,
            payload.value,
        ) {
            Some(update) => update,
            None => return Ok(()),
        };

        let message = WebSocketMessage::skill_tree_update(&update.skill_tree);
        MessageBroadcaster::broadcast_to_connections(
            &self.connection_manager,
            &update.recipients,
            &message,
        )
        .await
    }

    /// Host only: signals every client in the room that the game begins.
    pub async fn handle_start_game(
        &self,
        connection_id: &str,
        payload: StartGamePayload,
    ) -> Result<(), SessionEventError> {
        let recipients = match self.registry.start_game(&payload.room_id, connection_id) {
            Some(recipients) => recipients,
            None => {
                debug!(
                    room_id = %payload.room_id,
                    caller_id = %connection_id,
                    "Start game request dropped"
                );
                return Ok(());
            }
        };

        let message = WebSocketMessage::game_starting();
        MessageBroadcaster::broadcast_to_connections(
            &self.connection_manager,
            &recipients,
            &message,
        )
        .await
    }
}
