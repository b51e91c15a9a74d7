use serde_json::Number;
use std::collections::HashMap;

use super::models::{Player, Room};

/// Result of attempting to join a room
#[derive(Debug, Clone)]
pub enum JoinOutcome {
    /// Caller was added; carries the post-insertion room state and the
    /// freshly created player entry
    Joined { room: Room, player: Player },
    /// Room is at capacity (4 players)
    RoomFull,
    /// Room does not exist
    RoomNotFound,
}

/// Broadcast plan for an accepted player-input update.
///
/// `hp` is carried only when the input explicitly included one, so the
/// outbound update mirrors the partial-update semantics of the input.
#[derive(Debug, Clone)]
pub struct InputUpdate {
    /// Everyone in the room except the caller
    pub recipients: Vec<String>,
    pub x: f32,
    pub y: f32,
    pub hp: Option<i32>,
}

/// Broadcast plan after the host advances the wave
#[derive(Debug, Clone)]
pub struct WaveAdvance {
    pub wave: u32,
    pub seed: u64,
    pub recipients: Vec<String>,
}

/// Broadcast plan after the host changes a skill level
#[derive(Debug, Clone)]
pub struct SkillTreeUpdate {
    pub skill_tree: HashMap<String, Number>,
    pub recipients: Vec<String>,
}

/// One room affected by a disconnect sweep
#[derive(Debug, Clone)]
pub struct RoomDeparture {
    pub room_id: String,
    pub player_name: String,
    /// Members left in the room after the removal
    pub remaining: Vec<String>,
    /// True when the departure emptied the room and it was deleted
    pub room_deleted: bool,
}
