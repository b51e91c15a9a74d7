use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::HashMap;

use crate::session::models::{Player, Room};

/// Message types for WebSocket communication
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    // Client -> Server
    CreateRoom,
    JoinRoom,
    PlayerInput,
    WaveCleared,
    SkillTreeChoice,
    StartGame,

    // Both directions: inbound shot data, outbound with shooter id merged in
    PlayerShoot,

    // Server -> Client
    RoomCreated,
    JoinResult,
    PlayerJoined,
    PlayerUpdate,
    NextWave,
    SkillTreeUpdate,
    GameStarting,
    PlayerLeft,
}

/// Metadata for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessageMeta {
    pub timestamp: DateTime<Utc>,
}

/// Base structure for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessage {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub payload: Value,
    pub meta: Option<WebSocketMessageMeta>,
}

/// Client-to-Server message payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoomPayload {
    pub player_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRoomPayload {
    pub room_id: String,
    pub player_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerInputPayload {
    pub room_id: String,
    pub x: f32,
    pub y: f32,
    /// Absent means "leave the stored hp unchanged"
    #[serde(default)]
    pub hp: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveClearedPayload {
    pub room_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillTreeChoicePayload {
    pub room_id: String,
    #[serde(rename = "type")]
    pub skill: String,
    pub value: Number,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartGamePayload {
    pub room_id: String,
}

/// Server-to-Client message payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomCreatedPayload {
    pub room_id: String,
    pub player_id: String,
    pub is_host: bool,
    pub room_state: Room,
    pub players: HashMap<String, Player>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinResultPayload {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_state: Option<Room>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub players: Option<HashMap<String, Player>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerJoinedPayload {
    pub id: String,
    pub state: Player,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerUpdatePayload {
    pub id: String,
    pub x: f32,
    pub y: f32,
    /// Present if and only if the originating input carried an hp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextWavePayload {
    pub wave: u32,
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStartingPayload {
    // Empty payload - the signal is the message type itself
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerLeftPayload {
    pub id: String,
}

/// Helper functions for creating messages
impl WebSocketMessage {
    pub fn new(message_type: MessageType, payload: Value) -> Self {
        Self {
            message_type,
            payload,
            meta: Some(WebSocketMessageMeta {
                timestamp: Utc::now(),
            }),
        }
    }

    /// Create a ROOM_CREATED ack for the creating connection
    pub fn room_created(room: &Room, player_id: String) -> Self {
        let payload = RoomCreatedPayload {
            room_id: room.room_id.clone(),
            player_id,
            is_host: true,
            room_state: room.clone(),
            players: room.players.clone(),
        };
        Self::new(
            MessageType::RoomCreated,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create a successful JOIN_RESULT ack from post-insertion room state
    pub fn join_success(room: &Room, player_id: String) -> Self {
        let payload = JoinResultPayload {
            success: true,
            room_id: Some(room.room_id.clone()),
            player_id: Some(player_id),
            room_state: Some(room.clone()),
            players: Some(room.players.clone()),
            error: None,
        };
        Self::new(
            MessageType::JoinResult,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create a failed JOIN_RESULT ack
    pub fn join_failure(error: String) -> Self {
        let payload = JoinResultPayload {
            success: false,
            room_id: None,
            player_id: None,
            room_state: None,
            players: None,
            error: Some(error),
        };
        Self::new(
            MessageType::JoinResult,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create a PLAYER_JOINED announcement for the rest of the room
    pub fn player_joined(player: &Player) -> Self {
        let payload = PlayerJoinedPayload {
            id: player.id.clone(),
            state: player.clone(),
        };
        Self::new(
            MessageType::PlayerJoined,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create a PLAYER_UPDATE broadcast
    pub fn player_update(id: String, x: f32, y: f32, hp: Option<i32>) -> Self {
        let payload = PlayerUpdatePayload { id, x, y, hp };
        Self::new(
            MessageType::PlayerUpdate,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create a PLAYER_SHOOT broadcast: the client's opaque shot fields
    /// with the shooter id written last, so the server-assigned identity
    /// always wins
    pub fn player_shoot(shooter_id: String, shot_data: serde_json::Map<String, Value>) -> Self {
        let mut payload = shot_data;
        payload.insert("id".to_string(), Value::String(shooter_id));
        Self::new(MessageType::PlayerShoot, Value::Object(payload))
    }

    /// Create a NEXT_WAVE broadcast
    pub fn next_wave(wave: u32, seed: u64) -> Self {
        let payload = NextWavePayload { wave, seed };
        Self::new(
            MessageType::NextWave,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create a SKILL_TREE_UPDATE broadcast carrying the full mapping
    pub fn skill_tree_update(skill_tree: &HashMap<String, Number>) -> Self {
        Self::new(
            MessageType::SkillTreeUpdate,
            serde_json::to_value(skill_tree).unwrap(),
        )
    }

    /// Create a GAME_STARTING broadcast
    pub fn game_starting() -> Self {
        let payload = GameStartingPayload {};
        Self::new(
            MessageType::GameStarting,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create a PLAYER_LEFT broadcast
    pub fn player_left(id: String) -> Self {
        let payload = PlayerLeftPayload { id };
        Self::new(
            MessageType::PlayerLeft,
            serde_json::to_value(payload).unwrap(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_room() -> Room {
        Room::new(
            "ABC123".to_string(),
            42,
            "conn-a".to_string(),
            "alice".to_string(),
        )
    }

    #[test]
    fn test_message_constructors_and_serialization() {
        let room = sample_room();

        // room_created
        let m = WebSocketMessage::room_created(&room, "conn-a".to_string());
        assert!(matches!(m.message_type, MessageType::RoomCreated));
        let s = serde_json::to_string(&m).unwrap();
        let back: WebSocketMessage = serde_json::from_str(&s).unwrap();
        assert!(matches!(back.message_type, MessageType::RoomCreated));
        let payload: RoomCreatedPayload = serde_json::from_value(back.payload).unwrap();
        assert!(payload.is_host);
        assert_eq!(payload.room_id, "ABC123");
        assert_eq!(payload.room_state.seed, 42);
        assert!(payload.players.contains_key("conn-a"));

        // join_success
        let j = WebSocketMessage::join_success(&room, "conn-b".to_string());
        assert!(matches!(j.message_type, MessageType::JoinResult));

        // player_joined
        let p = WebSocketMessage::player_joined(room.players.get("conn-a").unwrap());
        assert!(matches!(p.message_type, MessageType::PlayerJoined));

        // next_wave
        let w = WebSocketMessage::next_wave(3, 42);
        assert!(matches!(w.message_type, MessageType::NextWave));
        assert_eq!(w.payload["wave"], 3);
        assert_eq!(w.payload["seed"], 42);

        // skill_tree_update
        let t = WebSocketMessage::skill_tree_update(&room.skill_tree);
        assert!(matches!(t.message_type, MessageType::SkillTreeUpdate));
        assert_eq!(t.payload["damage"], 1);

        // game_starting
        let g = WebSocketMessage::game_starting();
        assert!(matches!(g.message_type, MessageType::GameStarting));

        // player_left
        let l = WebSocketMessage::player_left("conn-b".to_string());
        assert!(matches!(l.message_type, MessageType::PlayerLeft));
        assert_eq!(l.payload["id"], "conn-b");
    }

    #[test]
    fn test_message_type_uses_screaming_snake_case_on_the_wire() {
        let m = WebSocketMessage::game_starting();
        let s = serde_json::to_string(&m).unwrap();
        assert!(s.contains("\"GAME_STARTING\""));
    }

    #[test]
    fn test_player_update_includes_hp_only_when_present() {
        let with_hp = WebSocketMessage::player_update("conn-a".to_string(), 1.0, 2.0, Some(80));
        let s = serde_json::to_string(&with_hp).unwrap();
        assert!(s.contains("\"hp\":80"));

        let without_hp = WebSocketMessage::player_update("conn-a".to_string(), 1.0, 2.0, None);
        let s = serde_json::to_string(&without_hp).unwrap();
        assert!(!s.contains("\"hp\""));
    }

    #[test]
    fn test_join_failure_omits_room_fields() {
        let m = WebSocketMessage::join_failure("Room full".to_string());
        let s = serde_json::to_string(&m).unwrap();
        assert!(s.contains("\"success\":false"));
        assert!(s.contains("\"error\":\"Room full\""));
        assert!(!s.contains("room_state"));
        assert!(!s.contains("player_id"));
    }

    #[test]
    fn test_player_shoot_merges_shooter_id_over_client_fields() {
        let mut shot = serde_json::Map::new();
        shot.insert("angle".to_string(), serde_json::json!(1.57));
        shot.insert("projectile".to_string(), serde_json::json!("laser"));
        shot.insert("id".to_string(), serde_json::json!("spoofed"));

        let m = WebSocketMessage::player_shoot("conn-a".to_string(), shot);

        assert!(matches!(m.message_type, MessageType::PlayerShoot));
        assert_eq!(m.payload["id"], "conn-a");
        assert_eq!(m.payload["angle"], 1.57);
        assert_eq!(m.payload["projectile"], "laser");
    }

    #[test]
    fn test_player_input_payload_parses_with_and_without_hp() {
        let with_hp: PlayerInputPayload = serde_json::from_value(serde_json::json!({
            "room_id": "ABC123", "x": 4.0, "y": 5.0, "hp": 73
        }))
        .unwrap();
        assert_eq!(with_hp.hp, Some(73));

        let without_hp: PlayerInputPayload = serde_json::from_value(serde_json::json!({
            "room_id": "ABC123", "x": 4.0, "y": 5.0
        }))
        .unwrap();
        assert_eq!(without_hp.hp, None);
    }

    #[test]
    fn test_skill_tree_choice_payload_uses_type_key() {
        let payload: SkillTreeChoicePayload = serde_json::from_value(serde_json::json!({
            "room_id": "ABC123", "type": "fireRate", "value": 2
        }))
        .unwrap();
        assert_eq!(payload.skill, "fireRate");
        assert_eq!(payload.value, Number::from(2));
    }
}
